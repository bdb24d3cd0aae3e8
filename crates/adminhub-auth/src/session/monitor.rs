//! Online-session inspection and administrative logout.

use tracing::{info, warn};

use adminhub_cache::Namespace;
use adminhub_core::error::AppError;
use adminhub_core::events::SessionEvent;
use adminhub_core::result::AppResult;

use super::manager::SessionManager;
use super::record::SessionRecord;

impl SessionManager {
    /// All live sessions, newest first.
    ///
    /// Records that expire between the key scan and the read are skipped.
    pub async fn list_sessions(&self) -> AppResult<Vec<SessionRecord>> {
        let ids = self.store.ids(Namespace::AccessSession).await?;

        let mut sessions = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.store.get_record(&id).await? {
                sessions.push(record);
            }
        }

        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    /// Number of live sessions.
    pub async fn count_sessions(&self) -> AppResult<usize> {
        Ok(self.store.ids(Namespace::AccessSession).await?.len())
    }

    /// A single live session by access token id.
    pub async fn find_session(&self, access_token_id: &str) -> AppResult<Option<SessionRecord>> {
        self.store.get_record(access_token_id).await
    }

    /// Ends a session on behalf of an administrator.
    ///
    /// Like a user logout the refresh mapping is left behind, so the
    /// owner's next refresh fails as stale.
    pub async fn force_logout(&self, access_token_id: &str) -> AppResult<SessionRecord> {
        let Some(record) = self.store.get_record(access_token_id).await? else {
            warn!(session_id = %access_token_id, "Forced logout of unknown session");
            return Err(AppError::not_found(format!(
                "Session {access_token_id} not found"
            )));
        };

        self.end_session(&record).await?;

        info!(
            session_id = %record.access_token_id,
            user_id = %record.user_id,
            "Session forcibly logged out"
        );
        self.auditor.record(SessionEvent::ForcedLogout {
            session_id: record.access_token_id.clone(),
            user_id: record.user_id.clone(),
        });

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use adminhub_core::error::ErrorKind;

    use super::super::manager::tests::{alice, manager};
    use crate::device::DeviceInfo;
    use crate::principal::Principal;

    use super::*;

    #[tokio::test]
    async fn test_list_sessions_newest_first() {
        let (manager, _) = manager(false);
        let bob = Principal::new("u-2", "bob", None, ["viewer"]);

        manager
            .create_session(&alice(), &DeviceInfo::unknown())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager
            .create_session(&bob, &DeviceInfo::unknown())
            .await
            .unwrap();

        let sessions = manager.list_sessions().await.unwrap();
        let names: Vec<_> = sessions.iter().map(|s| s.principal_name.as_str()).collect();
        assert_eq!(names, ["bob", "alice"]);
        assert_eq!(manager.count_sessions().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_force_logout() {
        let (manager, auditor) = manager(true);
        let pair = manager
            .create_session(&alice(), &DeviceInfo::unknown())
            .await
            .unwrap();
        let id = manager.list_sessions().await.unwrap()[0]
            .access_token_id
            .clone();

        let record = manager.force_logout(&id).await.unwrap();
        assert_eq!(record.user_id, "u-1");

        let err = manager.validate_access(&pair.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionNotFound);
        assert_eq!(manager.count_sessions().await.unwrap(), 0);
        assert_eq!(
            manager
                .store()
                .get(Namespace::SingleLoginIndex, "u-1")
                .await
                .unwrap(),
            None
        );
        assert!(auditor.payloads().contains(&SessionEvent::ForcedLogout {
            session_id: id.clone(),
            user_id: "u-1".to_string(),
        }));

        let err = manager
            .rotate_refresh(&pair.refresh_token, &DeviceInfo::unknown())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UserSessionStale);

        let err = manager.force_logout(&id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_find_session() {
        let (manager, _) = manager(false);
        manager
            .create_session(&alice(), &DeviceInfo::unknown())
            .await
            .unwrap();
        let id = manager.list_sessions().await.unwrap()[0]
            .access_token_id
            .clone();

        assert!(manager.find_session(&id).await.unwrap().is_some());
        assert!(manager.find_session("missing").await.unwrap().is_none());
    }
}
