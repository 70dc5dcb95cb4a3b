use anyhow::Result;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod auth;
mod config;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod templates;
mod validation;

#[cfg(test)]
mod test_support;

use common::database::{DatabaseConfig, init_pool};
use common::error::DatabaseError;
use tokio::net::TcpListener;

use crate::{
    auth::{AuthzConfig, CredentialService},
    config::AppConfig,
    repositories::{UserRepository, opportunity::OpportunityRepository},
    state::AppState,
    templates::PromptTemplates,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    let app_config = AppConfig::from_env()?;
    let authz = AuthzConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    // Load the prompt template set once; read-only afterwards
    let templates = Arc::new(PromptTemplates::load(&app_config.templates_path)?);

    info!("API service initialized successfully");

    // Initialize repositories and services
    let user_repository = UserRepository::new(pool.clone());
    let opportunity_repository = OpportunityRepository::new(pool.clone());
    let credential_service = CredentialService::new(user_repository.clone());

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        opportunity_repository,
        credential_service,
        templates,
        authz,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&app_config.bind_addr).await?;
    info!("API service listening on {}", app_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
