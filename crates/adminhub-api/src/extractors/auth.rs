//! `AuthUser` extractor: pulls the bearer token from the configured header
//! and validates it against the session store.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use adminhub_auth::device::extract_bearer;
use adminhub_auth::principal::Principal;
use adminhub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller available in handlers.
///
/// Extraction slides the session's TTL forward.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity behind the session.
    pub principal: Principal,
    /// The raw access token, needed for logout.
    pub token: String,
}

impl std::ops::Deref for AuthUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.principal
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = &state.config.auth;

        let header_value = parts
            .headers
            .get(auth.header.as_str())
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::token_malformed("Missing authorization header"))?;

        let token = extract_bearer(header_value, &auth.bearer_prefix)
            .ok_or_else(|| AppError::token_malformed("Invalid authorization header format"))?;

        let principal = state.session_manager.validate_access(token).await?;

        Ok(AuthUser {
            principal,
            token: token.to_string(),
        })
    }
}
