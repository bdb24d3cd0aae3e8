//! Statically configured login accounts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A login account resolvable without an external directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Stable user identifier.
    pub user_id: Uuid,
    /// Login name, matched case-insensitively.
    pub username: String,
    /// Argon2 PHC-format password hash.
    pub password_hash: String,
    /// Department (tenant) scope.
    #[serde(default)]
    pub dept_id: Option<String>,
    /// Role names granted to the account.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Disabled accounts cannot log in.
    #[serde(default)]
    pub disabled: bool,
}
