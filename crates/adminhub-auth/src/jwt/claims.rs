//! Claims embedded in every access and refresh token.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token claims payload.
///
/// There is deliberately no token-type claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Opaque store lookup key; not the user id.
    #[serde(rename = "tid")]
    pub token_id: String,
    /// Principal (login) name.
    #[serde(rename = "sub")]
    pub principal_name: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl TokenClaims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Time left until `exp`, at millisecond resolution (zero if expired).
    ///
    /// A store entry given this TTL never outlives the token.
    pub fn remaining_ttl(&self) -> Duration {
        let remaining_ms = self.exp * 1000 - Utc::now().timestamp_millis();
        Duration::from_millis(remaining_ms.max(0) as u64)
    }

    /// Returns the remaining TTL in seconds (0 if expired).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }
}
