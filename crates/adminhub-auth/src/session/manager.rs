//! Session lifecycle: issuance, validation, refresh, and logout.
//!
//! ```text
//! create_session ──→ [Active] ──validate_access──→ [Extended] ─┐
//!                       │  ▲                                   │
//!                       │  └───────────────────────────────────┘
//!                       ├── rotate_refresh / single-login ──→ [Superseded]
//!                       ├── invalidate / force_logout ──────→ [Revoked]
//!                       └── TTL elapses ────────────────────→ [Expired]
//! ```
//!
//! All shared state lives in the session store; the manager itself is
//! immutable after construction and cheap to clone across tasks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use adminhub_cache::Namespace;
use adminhub_core::config::auth::AuthConfig;
use adminhub_core::error::AppError;
use adminhub_core::events::SessionEvent;
use adminhub_core::result::AppResult;

use crate::device::DeviceInfo;
use crate::jwt::{TokenClaims, TokenCodec};
use crate::principal::Principal;

use super::audit::SessionAuditor;
use super::record::SessionRecord;
use super::store::SessionStore;

/// Credentials handed back at login and on refresh.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Lifetimes and the single-login switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Access token lifetime; also the sliding session record TTL.
    pub access_ttl: Duration,
    /// Refresh token and refresh mapping lifetime.
    pub refresh_ttl: Duration,
    /// One live session per user.
    pub single_login: bool,
}

impl SessionPolicy {
    /// Policy from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
            single_login: config.single_login_enabled,
        }
    }
}

/// Manages the complete session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// Token signing and verification.
    pub(super) codec: Arc<TokenCodec>,
    /// Namespaced session store.
    pub(super) store: SessionStore,
    /// Sink for lifecycle events.
    pub(super) auditor: Arc<dyn SessionAuditor>,
    /// Lifetimes and single-login switch.
    pub(super) policy: SessionPolicy,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("policy", &self.policy)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        codec: Arc<TokenCodec>,
        store: SessionStore,
        auditor: Arc<dyn SessionAuditor>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            codec,
            store,
            auditor,
            policy,
        }
    }

    /// The active policy.
    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// The underlying session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Issues an access/refresh pair for an authenticated principal.
    ///
    /// Writes the session record, then the refresh mapping, then (with
    /// single-login) the user index. A failure part-way leaves at worst a
    /// refresh mapping with no session, which rotation rejects as stale.
    pub async fn create_session(
        &self,
        principal: &Principal,
        device: &DeviceInfo,
    ) -> AppResult<TokenPair> {
        let access_id = new_token_id();
        let refresh_id = new_token_id();

        let (access_token, access_expires_at) =
            self.codec
                .issue(&access_id, &principal.principal_name, self.policy.access_ttl)?;
        let (refresh_token, refresh_expires_at) =
            self.codec
                .issue(&refresh_id, &principal.principal_name, self.policy.refresh_ttl)?;

        let record = SessionRecord::new(
            access_id.clone(),
            refresh_id.clone(),
            principal,
            device,
            Utc::now(),
        );

        self.store
            .put_record(&record, self.policy.access_ttl)
            .await?;
        self.store
            .put(
                Namespace::RefreshMapping,
                &refresh_id,
                &access_id,
                self.policy.refresh_ttl,
            )
            .await?;

        if self.policy.single_login {
            self.claim_single_login(&principal.user_id, &access_id)
                .await?;
        }

        self.auditor.record(SessionEvent::Created {
            session_id: access_id,
            user_id: principal.user_id.clone(),
            client_ip: device.client_ip.clone(),
        });

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Verifies an access token, slides its session TTL, and returns the
    /// session's principal.
    ///
    /// A correctly signed token whose session is gone fails with
    /// `SessionNotFound`.
    pub async fn validate_access(&self, token: &str) -> AppResult<Principal> {
        let claims = self.codec.verify(token)?;
        let record = self.load_session(&claims).await?;

        let extended = self
            .store
            .extend(
                Namespace::AccessSession,
                &claims.token_id,
                self.policy.access_ttl,
            )
            .await?;
        if !extended {
            // Deleted between the read and the extend.
            return Err(AppError::session_not_found("Session has ended"));
        }

        debug!(session_id = %claims.token_id, user_id = %record.user_id, "Access validated");
        Ok(record.principal())
    }

    /// Boolean form of [`validate_access`](Self::validate_access).
    ///
    /// Credential failures become `Ok(false)`; store failures stay errors.
    pub async fn is_access_valid(&self, token: &str) -> AppResult<bool> {
        credential_check(self.validate_access(token).await)
    }

    /// Whether a refresh token is signed, unexpired, and still mapped.
    ///
    /// Does not touch any TTL. Credential failures become `Ok(false)`;
    /// store failures stay errors.
    pub async fn validate_refresh(&self, token: &str) -> AppResult<bool> {
        credential_check(self.resolve_refresh(token).await)
    }

    /// Replaces the session paired with `refresh_token` by a new one and
    /// returns a new access token.
    ///
    /// The refresh token itself is reused: its id, mapping and expiry are
    /// unchanged and it is returned as-is.
    pub async fn rotate_refresh(
        &self,
        refresh_token: &str,
        device: &DeviceInfo,
    ) -> AppResult<TokenPair> {
        let (claims, old_access_id) = self.resolve_refresh(refresh_token).await?;

        let Some(old) = self.store.get_record(&old_access_id).await? else {
            info!(
                refresh_id = %claims.token_id,
                session_id = %old_access_id,
                "Refresh token outlived its session"
            );
            return Err(AppError::user_session_stale(
                "The session for this refresh token has ended",
            ));
        };

        if old.refresh_token_id != claims.token_id || old.principal_name != claims.principal_name
        {
            self.auditor.record(SessionEvent::Anomaly {
                token_id: claims.token_id.clone(),
                detail: format!(
                    "refresh mapping names session {old_access_id} which is paired elsewhere"
                ),
            });
            return Err(AppError::refresh_token_invalid(
                "Refresh token is not paired with its session",
            ));
        }

        // The mapping keeps the expiry it was created with.
        let mapping_ttl = claims.remaining_ttl();
        if mapping_ttl.is_zero() {
            return Err(AppError::token_expired("Refresh token has expired"));
        }

        let new_access_id = new_token_id();
        let (access_token, access_expires_at) =
            self.codec
                .issue(&new_access_id, &old.principal_name, self.policy.access_ttl)?;
        let record = old.succeed(new_access_id.clone(), device, Utc::now());

        // New record is durable before the old one goes away.
        self.store
            .put_record(&record, self.policy.access_ttl)
            .await?;
        self.store
            .delete(Namespace::AccessSession, &old_access_id)
            .await?;
        self.store
            .put(
                Namespace::RefreshMapping,
                &claims.token_id,
                &new_access_id,
                mapping_ttl,
            )
            .await?;

        if self.policy.single_login {
            self.store
                .put(
                    Namespace::SingleLoginIndex,
                    &record.user_id,
                    &new_access_id,
                    self.policy.refresh_ttl,
                )
                .await?;
        }

        self.auditor.record(SessionEvent::Rotated {
            old_session_id: old_access_id,
            new_session_id: new_access_id,
            user_id: record.user_id.clone(),
        });

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_token.to_string(),
            access_expires_at,
            refresh_expires_at: claims.expires_at(),
        })
    }

    /// Logs out the session behind `access_token`.
    ///
    /// The refresh mapping is left in place, so a later refresh fails
    /// explicitly with `UserSessionStale`.
    pub async fn invalidate(&self, access_token: &str) -> AppResult<()> {
        let claims = self.codec.verify(access_token)?;
        let record = self.load_session(&claims).await?;

        self.end_session(&record).await?;

        self.auditor.record(SessionEvent::Revoked {
            session_id: record.access_token_id,
            user_id: record.user_id,
        });
        Ok(())
    }

    /// Remaining lifetime of a session record.
    pub async fn session_ttl(&self, access_token_id: &str) -> AppResult<Option<Duration>> {
        self.store
            .ttl(Namespace::AccessSession, access_token_id)
            .await
    }

    /// Deletes a session record and its single-login index entry.
    pub(super) async fn end_session(&self, record: &SessionRecord) -> AppResult<()> {
        self.store
            .delete(Namespace::AccessSession, &record.access_token_id)
            .await?;

        if self.policy.single_login {
            self.release_single_login(&record.user_id, &record.access_token_id)
                .await?;
        }
        Ok(())
    }

    /// Loads the record a verified token points at.
    async fn load_session(&self, claims: &TokenClaims) -> AppResult<SessionRecord> {
        let record = self
            .store
            .get_record(&claims.token_id)
            .await?
            .ok_or_else(|| AppError::session_not_found("Session not found or expired"))?;

        if record.principal_name != claims.principal_name {
            self.auditor.record(SessionEvent::Anomaly {
                token_id: claims.token_id.clone(),
                detail: "token principal does not match the session record".to_string(),
            });
            return Err(AppError::session_not_found("Session not found or expired"));
        }

        Ok(record)
    }

    /// Verifies a refresh token and resolves the access session it maps to.
    async fn resolve_refresh(&self, token: &str) -> AppResult<(TokenClaims, String)> {
        let claims = self.codec.verify(token)?;
        let access_id = self
            .store
            .get(Namespace::RefreshMapping, &claims.token_id)
            .await?
            .ok_or_else(|| AppError::refresh_token_invalid("Refresh token is not recognized"))?;

        Ok((claims, access_id))
    }

    /// Points the user's index at `access_id`, deleting any other session
    /// it named. Concurrent logins race last-writer-wins; the loser's
    /// record survives until its TTL lapses.
    async fn claim_single_login(&self, user_id: &str, access_id: &str) -> AppResult<()> {
        let prior = self
            .store
            .get(Namespace::SingleLoginIndex, user_id)
            .await?;

        if let Some(prior) = prior.filter(|prior| prior != access_id) {
            self.store
                .delete(Namespace::AccessSession, &prior)
                .await?;
            self.auditor.record(SessionEvent::Evicted {
                old_session_id: prior,
                new_session_id: access_id.to_string(),
                user_id: user_id.to_string(),
            });
        }

        self.store
            .put(
                Namespace::SingleLoginIndex,
                user_id,
                access_id,
                self.policy.refresh_ttl,
            )
            .await
    }

    /// Drops the user's index entry if it still names `access_id`.
    async fn release_single_login(&self, user_id: &str, access_id: &str) -> AppResult<()> {
        let indexed = self
            .store
            .get(Namespace::SingleLoginIndex, user_id)
            .await?;

        if indexed.as_deref() == Some(access_id) {
            self.store
                .delete(Namespace::SingleLoginIndex, user_id)
                .await?;
        }
        Ok(())
    }
}

/// Fresh opaque token id, never derived from another.
fn new_token_id() -> String {
    Uuid::new_v4().to_string()
}

/// Folds credential failures into `false`, keeping infrastructure errors.
fn credential_check<T>(result: AppResult<T>) -> AppResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(e) if e.is_credential_error() => Ok(false),
        Err(e) => Err(e),
    }
}
