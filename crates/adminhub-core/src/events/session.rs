//! Session-related domain events.

use serde::{Deserialize, Serialize};

/// Events related to session lifecycle transitions.
///
/// Session identifiers are access token ids; token strings never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A new session was created at login.
    Created {
        /// The new access token id.
        session_id: String,
        /// The user ID.
        user_id: String,
        /// Client IP of the login request.
        client_ip: String,
    },
    /// A prior session was deleted by single-login enforcement.
    Evicted {
        /// The superseded access token id.
        old_session_id: String,
        /// The access token id that replaced it.
        new_session_id: String,
        /// The user ID.
        user_id: String,
    },
    /// A refresh rotation replaced one session with another.
    Rotated {
        /// The superseded access token id.
        old_session_id: String,
        /// The new access token id.
        new_session_id: String,
        /// The user ID.
        user_id: String,
    },
    /// The user logged out.
    Revoked {
        /// The access token id.
        session_id: String,
        /// The user ID.
        user_id: String,
    },
    /// An administrator forced the session out.
    ForcedLogout {
        /// The access token id.
        session_id: String,
        /// The user ID.
        user_id: String,
    },
    /// Store state contradicted itself or the presented token.
    Anomaly {
        /// The token id involved.
        token_id: String,
        /// What was inconsistent.
        detail: String,
    },
}

impl SessionEvent {
    /// Short machine name of the event, used as a log field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Evicted { .. } => "evicted",
            Self::Rotated { .. } => "rotated",
            Self::Revoked { .. } => "revoked",
            Self::ForcedLogout { .. } => "forced_logout",
            Self::Anomaly { .. } => "anomaly",
        }
    }
}
