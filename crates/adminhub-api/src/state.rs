//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use adminhub_auth::device::RegionResolver;
use adminhub_auth::principal::PrincipalResolver;
use adminhub_auth::session::SessionManager;
use adminhub_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// Credentials to principal lookup
    pub principal_resolver: Arc<dyn PrincipalResolver>,
    /// IP to region lookup for session metadata
    pub region_resolver: Arc<dyn RegionResolver>,
}

impl AppState {
    /// Bundles the shared dependencies.
    pub fn new(
        config: Arc<AppConfig>,
        session_manager: Arc<SessionManager>,
        principal_resolver: Arc<dyn PrincipalResolver>,
        region_resolver: Arc<dyn RegionResolver>,
    ) -> Self {
        Self {
            config,
            session_manager,
            principal_resolver,
            region_resolver,
        }
    }
}
