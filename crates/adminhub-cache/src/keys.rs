//! Key builders for the session store namespaces.
//!
//! Centralising key construction keeps every namespace prefix in one place.

use std::fmt;

/// The three session store namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Session records keyed by access token id.
    AccessSession,
    /// Refresh token id → paired access token id.
    RefreshMapping,
    /// User id → the single active access token id.
    SingleLoginIndex,
}

impl Namespace {
    /// Key prefix of the namespace, including the trailing separator.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::AccessSession => "session:access:",
            Self::RefreshMapping => "session:refresh:",
            Self::SingleLoginIndex => "session:login:",
        }
    }

    /// Full store key for an id within this namespace.
    pub fn key(&self, id: &str) -> String {
        format!("{}{id}", self.prefix())
    }

    /// Strip this namespace's prefix from a full key.
    pub fn strip<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessSession => write!(f, "access-session"),
            Self::RefreshMapping => write!(f, "refresh-mapping"),
            Self::SingleLoginIndex => write!(f, "single-login-index"),
        }
    }
}
