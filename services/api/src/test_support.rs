//! Shared helpers for database-backed tests
//!
//! Tests that need PostgreSQL call [`test_pool`] and return early when no
//! `DATABASE_URL` is configured, so the suite stays green without
//! infrastructure.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect to the test database and apply migrations
///
/// Returns `None` when `DATABASE_URL` is not set. Once the variable is
/// set, connection or migration failures are hard errors.
pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database-backed test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to test database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("failed to apply migrations to test database");

    Some(pool)
}
