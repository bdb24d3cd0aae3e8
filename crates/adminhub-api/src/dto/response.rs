//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_auth::principal::Principal;
use adminhub_auth::session::{SessionRecord, TokenPair};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            access_expires_at: pair.access_expires_at,
            refresh_expires_at: pair.refresh_expires_at,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Issued tokens.
    #[serde(flatten)]
    pub tokens: TokenResponse,
    /// Who logged in.
    pub user: Principal,
}

/// Online session row for the admin monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineSessionResponse {
    /// Access token id; the handle used to force a logout.
    pub token_id: String,
    /// User ID.
    pub user_id: String,
    /// Login name.
    pub principal_name: String,
    /// Department.
    pub dept_id: Option<String>,
    /// Client IP.
    pub client_ip: String,
    /// Region of the client IP.
    pub geo_region: String,
    /// Operating system.
    pub os: String,
    /// Browser.
    pub browser: String,
    /// Device class.
    pub device: String,
    /// Session creation time.
    pub created_at: DateTime<Utc>,
    /// Last credential activity.
    pub last_access_at: DateTime<Utc>,
}

impl From<SessionRecord> for OnlineSessionResponse {
    fn from(record: SessionRecord) -> Self {
        Self {
            token_id: record.access_token_id,
            user_id: record.user_id,
            principal_name: record.principal_name,
            dept_id: record.dept_id,
            client_ip: record.client_ip,
            geo_region: record.geo_region,
            os: record.os,
            browser: record.browser,
            device: record.device,
            created_at: record.created_at,
            last_access_at: record.last_access_at,
        }
    }
}

/// Online session listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineListResponse {
    /// Number of sessions.
    pub total: usize,
    /// Sessions, newest first.
    pub sessions: Vec<OnlineSessionResponse>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Session store reachability.
    pub store: String,
}
