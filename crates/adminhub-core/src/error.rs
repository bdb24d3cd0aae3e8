//! Unified application error types for AdminHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
///
/// The `Token*`, `SessionNotFound`, `RefreshTokenInvalid` and
/// `UserSessionStale` kinds all mean "this credential is not currently
/// valid" and should send the caller back to re-authentication.
/// `StoreUnavailable` is a retryable infrastructure failure and must never
/// be reported as an authentication rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The token is structurally invalid.
    TokenMalformed,
    /// The token signature does not match its contents.
    TokenSignatureInvalid,
    /// The token expiry is in the past.
    TokenExpired,
    /// The token uses an unsupported header or algorithm.
    TokenUnsupportedFormat,
    /// The token is well-formed but names no live session.
    SessionNotFound,
    /// The refresh token names no live refresh mapping.
    RefreshTokenInvalid,
    /// The refresh token outlived the session it was paired with.
    UserSessionStale,
    /// The session store could not be reached or timed out.
    StoreUnavailable,
    /// Login credentials were rejected.
    Authentication,
    /// The caller lacks the role required for the action.
    Authorization,
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind classifies a credential as not currently valid.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            Self::TokenMalformed
                | Self::TokenSignatureInvalid
                | Self::TokenExpired
                | Self::TokenUnsupportedFormat
                | Self::SessionNotFound
                | Self::RefreshTokenInvalid
                | Self::UserSessionStale
        )
    }

    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenMalformed => write!(f, "TOKEN_MALFORMED"),
            Self::TokenSignatureInvalid => write!(f, "TOKEN_SIGNATURE_INVALID"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::TokenUnsupportedFormat => write!(f, "TOKEN_UNSUPPORTED_FORMAT"),
            Self::SessionNotFound => write!(f, "SESSION_NOT_FOUND"),
            Self::RefreshTokenInvalid => write!(f, "REFRESH_TOKEN_INVALID"),
            Self::UserSessionStale => write!(f, "USER_SESSION_STALE"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout AdminHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a malformed-token error.
    pub fn token_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenMalformed, message)
    }

    /// Create a signature-mismatch error.
    pub fn token_signature_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenSignatureInvalid, message)
    }

    /// Create an expired-token error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create an unsupported-format error.
    pub fn token_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenUnsupportedFormat, message)
    }

    /// Create a session-not-found error.
    pub fn session_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionNotFound, message)
    }

    /// Create a refresh-token-invalid error.
    pub fn refresh_token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RefreshTokenInvalid, message)
    }

    /// Create a stale-session error.
    pub fn user_session_stale(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserSessionStale, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Shorthand for `self.kind.is_credential_error()`.
    pub fn is_credential_error(&self) -> bool {
        self.kind.is_credential_error()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_classification() {
        assert!(ErrorKind::TokenExpired.is_credential_error());
        assert!(ErrorKind::UserSessionStale.is_credential_error());
        assert!(!ErrorKind::StoreUnavailable.is_credential_error());
        assert!(ErrorKind::StoreUnavailable.is_retryable());
        assert!(!ErrorKind::SessionNotFound.is_retryable());
    }

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::session_not_found("gone");
        assert_eq!(err.to_string(), "SESSION_NOT_FOUND: gone");
    }
}
