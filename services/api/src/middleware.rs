//! Bearer credential extraction
//!
//! Handlers receive the caller's identity through extractors and decide
//! with the configured [`crate::auth::AuthPolicy`] whether a credential is
//! required. An absent Authorization header is an anonymous caller; a
//! bearer token that does not resolve to a user is rejected outright.

use axum::{RequestPartsExt, async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::error;

use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

/// The caller's identity, when a bearer token was presented
///
/// `None` means no credential was offered; policy decides whether that is
/// acceptable for the operation.
pub struct MaybeAuthUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header: Option<TypedHeader<Authorization<Bearer>>> =
            parts.extract().await.unwrap_or(None);

        let Some(TypedHeader(Authorization(bearer))) = header else {
            return Ok(Self(None));
        };

        let user = state
            .credential_service
            .resolve_token(bearer.token())
            .await
            .inspect_err(|e| error!("Failed to resolve bearer token: {}", e))?;

        Ok(Self(Some(user)))
    }
}
