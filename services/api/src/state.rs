//! Application state shared across handlers
//!
//! All dependencies are explicit, passed-in values: the store handle, the
//! repositories built on it, the credential service, the read-only
//! template set, and the authorization configuration. There are no
//! ambient singletons.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{AuthzConfig, CredentialService};
use crate::repositories::{UserRepository, opportunity::OpportunityRepository};
use crate::templates::PromptTemplates;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub opportunity_repository: OpportunityRepository,
    pub credential_service: CredentialService,
    /// Loaded template set, read-only after startup
    pub templates: Arc<PromptTemplates>,
    pub authz: AuthzConfig,
}
