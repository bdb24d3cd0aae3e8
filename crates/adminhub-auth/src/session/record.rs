//! Server-side state describing one live access token.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::DeviceInfo;
use crate::principal::Principal;

/// Session record stored under `access-session[access_token_id]`.
///
/// Owned by the session manager; the store treats it as an opaque value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Id of the access token this record belongs to.
    pub access_token_id: String,
    /// Id of the refresh token currently paired with this session.
    pub refresh_token_id: String,
    /// User identifier.
    pub user_id: String,
    /// Login name.
    pub principal_name: String,
    /// Department (tenant) scope.
    pub dept_id: Option<String>,
    /// Role names.
    pub roles: BTreeSet<String>,
    /// Client IP address.
    pub client_ip: String,
    /// Coarse region of the client IP.
    pub geo_region: String,
    /// Raw user agent.
    pub user_agent: String,
    /// Operating system.
    pub os: String,
    /// Browser.
    pub browser: String,
    /// Device class.
    pub device: String,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
    /// Last time the session was used to mint or refresh credentials.
    pub last_access_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Builds a record for a freshly authenticated principal.
    pub fn new(
        access_token_id: String,
        refresh_token_id: String,
        principal: &Principal,
        device: &DeviceInfo,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token_id,
            refresh_token_id,
            user_id: principal.user_id.clone(),
            principal_name: principal.principal_name.clone(),
            dept_id: principal.dept_id.clone(),
            roles: principal.roles.clone(),
            client_ip: device.client_ip.clone(),
            geo_region: device.geo_region.clone(),
            user_agent: device.user_agent.clone(),
            os: device.os.clone(),
            browser: device.browser.clone(),
            device: device.device.clone(),
            created_at: now,
            last_access_at: now,
        }
    }

    /// Builds the record that supersedes this one on refresh: same identity
    /// and refresh pairing, new access id, fresh device metadata.
    pub fn succeed(&self, access_token_id: String, device: &DeviceInfo, now: DateTime<Utc>) -> Self {
        Self::new(
            access_token_id,
            self.refresh_token_id.clone(),
            &self.principal(),
            device,
            now,
        )
    }

    /// The identity carried by this session.
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id.clone(),
            principal_name: self.principal_name.clone(),
            dept_id: self.dept_id.clone(),
            roles: self.roles.clone(),
        }
    }
}
