//! Token encoding, decoding, and claims management.
//!
//! The codec knows nothing about access versus refresh tokens: the caller
//! picks the TTL when issuing and the store namespace when resolving.

pub mod claims;
pub mod decoder;
pub mod encoder;

use std::time::Duration;

use chrono::{DateTime, Utc};

use adminhub_core::config::auth::AuthConfig;
use adminhub_core::result::AppResult;

pub use claims::TokenClaims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;

/// Signing and verification with one shared secret.
///
/// Built once at startup from [`AuthConfig`] and shared read-only.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenCodec {
    /// Creates a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(config.signing_secret.as_bytes(), config.clock_skew_seconds)
    }

    /// Creates a codec from a raw secret and clock-skew leeway.
    pub fn from_secret(secret: &[u8], leeway_seconds: u64) -> Self {
        Self {
            encoder: JwtEncoder::new(secret),
            decoder: JwtDecoder::new(secret, leeway_seconds),
        }
    }

    /// Mints a signed token for `token_id` valid for `ttl`.
    pub fn issue(
        &self,
        token_id: &str,
        principal_name: &str,
        ttl: Duration,
    ) -> AppResult<(String, DateTime<Utc>)> {
        self.encoder.issue(token_id, principal_name, ttl)
    }

    /// Verifies signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> AppResult<TokenClaims> {
        self.decoder.verify(token)
    }
}
