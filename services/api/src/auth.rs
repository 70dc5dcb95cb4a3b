//! Credential service and authorization policy
//!
//! The credential service issues and validates opaque bearer tokens, with
//! at most one live token per user: a later login overwrites the stored
//! token and the previous one stops resolving. Concurrent logins by the
//! same user are last-writer-wins.
//!
//! The authorization policy is decided once at startup and consulted per
//! operation by the handlers, instead of being hard-wired into routes.

use anyhow::Result;
use rand::{Rng, distributions::Alphanumeric};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{RegisterRequest, User};
use crate::repositories::UserRepository;
use crate::validation::validate_name;

/// Length of generated session tokens
const TOKEN_LENGTH: usize = 48;

/// Generate a fresh unguessable opaque session token
///
/// Drawn from the thread-local CSPRNG, never from counters or timestamps.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Credential service
///
/// Thin orchestration over the user repository: registration, token
/// issuance, and token resolution.
#[derive(Clone)]
pub struct CredentialService {
    users: UserRepository,
}

impl CredentialService {
    /// Create a new credential service
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Register a new user, hashing the password when one is supplied
    pub async fn register(&self, payload: &RegisterRequest) -> ApiResult<User> {
        validate_name(&payload.name).map_err(ApiError::Validation)?;
        self.users.create(payload).await
    }

    /// Issue a fresh token for a user, invalidating any previous token
    pub async fn issue_token(&self, name: &str, password: &str) -> ApiResult<String> {
        let user = self
            .users
            .find_by_name(name)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if !self.users.verify_password(&user, password)? {
            return Err(ApiError::Unauthorized);
        }

        let token = generate_token();
        self.users.store_token(user.id, &token).await?;
        info!("Issued new session token for user: {}", user.name);

        Ok(token)
    }

    /// Resolve a token back to the user currently holding it
    pub async fn resolve_token(&self, token: &str) -> ApiResult<User> {
        self.users
            .find_by_token(token)
            .await?
            .ok_or(ApiError::Unauthorized)
    }
}

/// Per-operation authorization policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// No credential required
    Open,
    /// A resolved token is required
    RequireToken,
    /// A resolved token is required and, where the record has an owner,
    /// the caller must be that owner
    RequireOwner,
}

impl AuthPolicy {
    /// Parse a policy from its configuration spelling
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "open" => Ok(Self::Open),
            "require-token" => Ok(Self::RequireToken),
            "require-owner" => Ok(Self::RequireOwner),
            other => anyhow::bail!(
                "invalid auth policy '{}', expected open, require-token, or require-owner",
                other
            ),
        }
    }

    /// Enforce the credential requirement of this policy
    ///
    /// Returns the caller back so handlers can use the resolved identity.
    pub fn require_caller(&self, caller: Option<User>) -> ApiResult<Option<User>> {
        match self {
            Self::Open => Ok(caller),
            Self::RequireToken | Self::RequireOwner => {
                if caller.is_none() {
                    return Err(ApiError::Unauthorized);
                }
                Ok(caller)
            }
        }
    }

    /// Enforce the owner-match requirement against a record's owner
    ///
    /// Records without an owner pass under every policy.
    pub fn check_owner(&self, caller: Option<&User>, owner: Option<Uuid>) -> ApiResult<()> {
        if *self != Self::RequireOwner {
            return Ok(());
        }

        match (caller, owner) {
            (_, None) => Ok(()),
            (Some(user), Some(owner_id)) if user.id == owner_id => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// Authorization configuration for the gated operations
#[derive(Debug, Clone, Copy)]
pub struct AuthzConfig {
    pub create_opportunity: AuthPolicy,
    pub list_opportunities: AuthPolicy,
    pub generate_prompt: AuthPolicy,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            create_opportunity: AuthPolicy::Open,
            list_opportunities: AuthPolicy::Open,
            generate_prompt: AuthPolicy::RequireToken,
        }
    }
}

impl AuthzConfig {
    /// Create a new AuthzConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AUTHZ_CREATE_OPPORTUNITY`: policy for opportunity creation (default: open)
    /// - `AUTHZ_LIST_OPPORTUNITIES`: policy for opportunity listing (default: open)
    /// - `AUTHZ_GENERATE_PROMPT`: policy for prompt generation (default: require-token)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            create_opportunity: policy_from_env("AUTHZ_CREATE_OPPORTUNITY", defaults.create_opportunity)?,
            list_opportunities: policy_from_env("AUTHZ_LIST_OPPORTUNITIES", defaults.list_opportunities)?,
            generate_prompt: policy_from_env("AUTHZ_GENERATE_PROMPT", defaults.generate_prompt)?,
        })
    }
}

fn policy_from_env(var: &str, default: AuthPolicy) -> Result<AuthPolicy> {
    match std::env::var(var) {
        Ok(value) => AuthPolicy::parse(&value),
        Err(_) => Ok(default),
    }
}
