//! The authenticated identity and the seam that produces it at login.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use adminhub_core::config::accounts::AccountConfig;
use adminhub_core::error::AppError;

use crate::password::PasswordHasher;

/// Identity carried by a session and returned on every validated access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Stable user identifier.
    pub user_id: String,
    /// Login name.
    pub principal_name: String,
    /// Department (tenant) scope.
    pub dept_id: Option<String>,
    /// Role names; order is irrelevant.
    pub roles: BTreeSet<String>,
}

impl Principal {
    /// Creates a principal from its parts.
    pub fn new(
        user_id: impl Into<String>,
        principal_name: impl Into<String>,
        dept_id: Option<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            principal_name: principal_name.into(),
            dept_id,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the principal holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Turns login credentials into a [`Principal`].
///
/// Implemented by whatever user directory the host system owns.
#[async_trait]
pub trait PrincipalResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve credentials, failing with an `Authentication` error if they
    /// are rejected.
    async fn resolve(&self, username: &str, password: &str) -> Result<Principal, AppError>;
}

/// Resolver over accounts listed in configuration.
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    /// Accounts keyed by lower-cased username.
    accounts: HashMap<String, AccountConfig>,
    /// Password hasher.
    hasher: PasswordHasher,
}

impl AccountDirectory {
    /// Builds the directory from configured accounts.
    pub fn new(accounts: &[AccountConfig]) -> Self {
        let accounts = accounts
            .iter()
            .map(|account| (account.username.to_lowercase(), account.clone()))
            .collect();

        Self {
            accounts,
            hasher: PasswordHasher::new(),
        }
    }

    /// Number of configured accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no accounts are configured.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl PrincipalResolver for AccountDirectory {
    async fn resolve(&self, username: &str, password: &str) -> Result<Principal, AppError> {
        let account = self
            .accounts
            .get(&username.to_lowercase())
            .ok_or_else(|| AppError::authentication("Invalid username or password"))?;

        if account.disabled {
            warn!(username = %account.username, "Login attempt on disabled account");
            return Err(AppError::authentication("Account is disabled"));
        }

        if !self
            .hasher
            .verify_password(password, &account.password_hash)?
        {
            debug!(username = %account.username, "Password mismatch");
            return Err(AppError::authentication("Invalid username or password"));
        }

        Ok(Principal::new(
            account.user_id.to_string(),
            account.username.clone(),
            account.dept_id.clone(),
            account.roles.iter().cloned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use adminhub_core::error::ErrorKind;

    use super::*;

    fn directory(disabled: bool) -> AccountDirectory {
        let hash = PasswordHasher::new().hash_password("hunter22").unwrap();
        AccountDirectory::new(&[AccountConfig {
            user_id: Uuid::nil(),
            username: "Admin".to_string(),
            password_hash: hash,
            dept_id: Some("103".to_string()),
            roles: vec!["admin".to_string(), "common".to_string()],
            disabled,
        }])
    }

    #[tokio::test]
    async fn test_resolve_success_is_case_insensitive() {
        let principal = directory(false).resolve("admin", "hunter22").await.unwrap();
        assert_eq!(principal.principal_name, "Admin");
        assert_eq!(principal.dept_id.as_deref(), Some("103"));
        assert!(principal.has_role("admin"));
        assert!(!principal.has_role("auditor"));
    }

    #[tokio::test]
    async fn test_resolve_rejections() {
        let dir = directory(false);
        let wrong = dir.resolve("admin", "nope").await.unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::Authentication);
        let missing = dir.resolve("ghost", "hunter22").await.unwrap_err();
        assert_eq!(missing.kind, ErrorKind::Authentication);

        let disabled = directory(true).resolve("admin", "hunter22").await.unwrap_err();
        assert_eq!(disabled.kind, ErrorKind::Authentication);
    }
}
