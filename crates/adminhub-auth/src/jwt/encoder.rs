//! Token creation with HMAC-SHA256 signing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use adminhub_core::error::AppError;

use super::claims::TokenClaims;

/// Creates signed tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from the shared secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    /// Signs a token naming `token_id`, expiring `ttl` from now.
    ///
    /// Sub-second TTLs are rounded up to one second, the claim resolution.
    pub fn issue(
        &self,
        token_id: &str,
        principal_name: &str,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let iat = Utc::now().timestamp();
        let ttl_seconds = ttl.as_secs().max(1) as i64;

        let claims = TokenClaims {
            token_id: token_id.to_string(),
            principal_name: principal_name.to_string(),
            iat,
            exp: iat + ttl_seconds,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok((token, claims.expires_at()))
    }
}
