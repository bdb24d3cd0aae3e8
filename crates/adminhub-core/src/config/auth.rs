//! Token signing and lifetime configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Built-in signing secret used when none is configured.
///
/// Publicly known, so [`AuthConfig::validate`] only accepts it together
/// with `allow_weak_secret`.
pub const PLACEHOLDER_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for HMAC-SHA256 token signing.
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,
    /// Permit short or placeholder secrets (local development only).
    #[serde(default)]
    pub allow_weak_secret: bool,
    /// Access token and session record lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_seconds: u64,
    /// Refresh token and refresh mapping lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_seconds: u64,
    /// Restrict every principal to a single live session.
    #[serde(default)]
    pub single_login_enabled: bool,
    /// Tolerated clock skew when checking token expiry, in seconds.
    #[serde(default)]
    pub clock_skew_seconds: u64,
    /// Header carrying the bearer credential.
    #[serde(default = "default_header")]
    pub header: String,
    /// Prefix stripped from the header value.
    #[serde(default = "default_bearer_prefix")]
    pub bearer_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: default_signing_secret(),
            allow_weak_secret: false,
            access_token_ttl_seconds: default_access_ttl(),
            refresh_token_ttl_seconds: default_refresh_ttl(),
            single_login_enabled: false,
            clock_skew_seconds: 0,
            header: default_header(),
            bearer_prefix: default_bearer_prefix(),
        }
    }
}

impl AuthConfig {
    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_seconds)
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_seconds)
    }

    /// Rejects zero lifetimes and a refresh lifetime shorter than the access
    /// lifetime. Short or placeholder secrets are rejected unless
    /// explicitly allowed.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_token_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "auth.access_token_ttl_seconds must be greater than zero",
            ));
        }
        if self.refresh_token_ttl_seconds < self.access_token_ttl_seconds {
            return Err(AppError::configuration(
                "auth.refresh_token_ttl_seconds must not be shorter than the access token TTL",
            ));
        }
        if self.signing_secret.is_empty() {
            return Err(AppError::configuration("auth.signing_secret is empty"));
        }
        if self.allow_weak_secret {
            return Ok(());
        }
        if self.signing_secret == PLACEHOLDER_SECRET {
            return Err(AppError::configuration(
                "auth.signing_secret is unset; set ADMINHUB__AUTH__SIGNING_SECRET",
            ));
        }
        if self.signing_secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "auth.signing_secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }
        Ok(())
    }
}

fn default_signing_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}

fn default_access_ttl() -> u64 {
    30 * 60
}

fn default_refresh_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_header() -> String {
    "authorization".to_string()
}

fn default_bearer_prefix() -> String {
    "Bearer ".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret(secret: &str) -> AuthConfig {
        AuthConfig {
            signing_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_default_secret_rejected() {
        let err = AuthConfig::default().validate().unwrap_err();
        assert!(err.message.contains("signing_secret"));

        let allowed = AuthConfig {
            allow_weak_secret: true,
            ..AuthConfig::default()
        };
        assert!(allowed.validate().is_ok());
    }

    #[test]
    fn test_configured_secret_accepted() {
        let config = with_secret("a-long-random-secret-of-at-least-32-bytes");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = with_secret("short");
        assert!(config.validate().is_err());

        let allowed = AuthConfig {
            allow_weak_secret: true,
            ..config
        };
        assert!(allowed.validate().is_ok());
    }

    #[test]
    fn test_refresh_shorter_than_access_rejected() {
        let config = AuthConfig {
            access_token_ttl_seconds: 600,
            refresh_token_ttl_seconds: 60,
            ..with_secret("a-long-random-secret-of-at-least-32-bytes")
        };
        assert!(config.validate().is_err());
    }
}
