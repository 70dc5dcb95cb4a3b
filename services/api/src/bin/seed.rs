//! Idempotent sample-data seeding
//!
//! Inserts a default user and a fixed set of opportunities. Opportunities
//! are keyed by title, so running the binary repeatedly updates rows in
//! place instead of creating duplicates.

use anyhow::Result;
use sqlx::PgPool;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use common::database::{DatabaseConfig, init_pool};
use common::error::DatabaseError;

struct SampleOpportunity {
    title: &'static str,
    market_description: &'static str,
    tam_estimate: f64,
    growth_rate: f64,
    consumer_insight: &'static str,
    hypothesis: &'static str,
}

const SAMPLE_OPPORTUNITIES: &[SampleOpportunity] = &[
    SampleOpportunity {
        title: "Eco-Friendly Water Bottle",
        market_description: "Reusable bottle market",
        tam_estimate: 1_200_000.0,
        growth_rate: 7.5,
        consumer_insight: "Consumers seek sustainable alternatives",
        hypothesis: "A durable bottle with filter will attract buyers",
    },
    SampleOpportunity {
        title: "Smart Home Energy Monitor",
        market_description: "Devices that track household energy usage",
        tam_estimate: 2_000_000.0,
        growth_rate: 10.0,
        consumer_insight: "People want to reduce energy bills",
        hypothesis: "Real-time usage alerts can save cost",
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Seeding sample data");

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    let user_id = ensure_sample_user(&pool).await?;

    for sample in SAMPLE_OPPORTUNITIES {
        upsert_opportunity(&pool, sample, user_id).await?;
    }

    info!("Sample data seeded successfully");
    Ok(())
}

/// Ensure the default user exists and return its id
async fn ensure_sample_user(pool: &PgPool) -> Result<Uuid> {
    let user_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (name)
        VALUES ('Sample User')
        ON CONFLICT (name) DO UPDATE SET updated_at = now()
        RETURNING id
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(user_id)
}

/// Insert or update an opportunity keyed by its title
async fn upsert_opportunity(
    pool: &PgPool,
    sample: &SampleOpportunity,
    user_id: Uuid,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO opportunities
            (title, market_description, tam_estimate, growth_rate,
             consumer_insight, hypothesis, user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (title) DO UPDATE SET
            market_description = EXCLUDED.market_description,
            tam_estimate = EXCLUDED.tam_estimate,
            growth_rate = EXCLUDED.growth_rate,
            consumer_insight = EXCLUDED.consumer_insight,
            hypothesis = EXCLUDED.hypothesis,
            user_id = EXCLUDED.user_id,
            updated_at = now()
        "#,
    )
    .bind(sample.title)
    .bind(sample.market_description)
    .bind(sample.tam_estimate)
    .bind(sample.growth_rate)
    .bind(sample.consumer_insight)
    .bind(sample.hypothesis)
    .bind(user_id)
    .execute(pool)
    .await?;

    info!("Upserted opportunity: {}", sample.title);
    Ok(())
}
