//! Shared test helpers for integration tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use adminhub_api::{AppState, build_router};
use adminhub_auth::device::LocalRegionResolver;
use adminhub_auth::jwt::TokenCodec;
use adminhub_auth::password::PasswordHasher;
use adminhub_auth::principal::AccountDirectory;
use adminhub_auth::session::{MemoryAuditor, SessionManager, SessionPolicy, SessionStore};
use adminhub_cache::CacheManager;
use adminhub_cache::memory::MemoryCacheProvider;
use adminhub_core::config::AppConfig;
use adminhub_core::config::accounts::AccountConfig;
use adminhub_core::traits::cache::CacheProvider;

/// Password shared by every test account.
pub const PASSWORD: &str = "correct horse battery";

/// Socket address every test request arrives from.
pub const PEER: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40000);

/// Client address the peer reports through `X-Forwarded-For`.
pub const FORWARDED_FOR: &str = "10.1.2.3";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Manager behind the router, for direct assertions
    pub manager: Arc<SessionManager>,
    /// Lifecycle events recorded during the test
    pub auditor: Arc<MemoryAuditor>,
}

impl TestApp {
    /// Create a test application over an in-memory store
    pub fn new(single_login: bool) -> Self {
        Self::with_provider(single_login, Arc::new(MemoryCacheProvider::default()))
    }

    /// Create a test application over an arbitrary store backend, with the
    /// test peer trusted as a proxy
    pub fn with_provider(single_login: bool, provider: Arc<dyn CacheProvider>) -> Self {
        Self::build(single_login, provider, vec![PEER.ip()])
    }

    /// Create a test application that trusts no forwarding proxy
    pub fn without_trusted_proxy() -> Self {
        Self::build(false, Arc::new(MemoryCacheProvider::default()), Vec::new())
    }

    fn build(
        single_login: bool,
        provider: Arc<dyn CacheProvider>,
        trusted_proxies: Vec<IpAddr>,
    ) -> Self {
        let hash = PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("Failed to hash password");

        let mut config = AppConfig::default();
        config.auth.single_login_enabled = single_login;
        config.server.trusted_proxies = trusted_proxies;
        config.accounts = vec![
            account("alice", &hash, &["admin"]),
            account("bob", &hash, &["viewer"]),
        ];

        let cache = CacheManager::from_provider(provider);
        let store = SessionStore::new(Arc::new(cache), Duration::from_millis(500));
        let auditor = Arc::new(MemoryAuditor::default());
        let manager = Arc::new(SessionManager::new(
            Arc::new(TokenCodec::new(&config.auth)),
            store,
            auditor.clone(),
            SessionPolicy::from_config(&config.auth),
        ));

        let state = AppState::new(
            Arc::new(config.clone()),
            Arc::clone(&manager),
            Arc::new(AccountDirectory::new(&config.accounts)),
            Arc::new(LocalRegionResolver),
        );

        Self {
            router: build_router(state),
            manager,
            auditor,
        }
    }

    /// Log in and return the `data` object of the response
    pub async fn login(&self, username: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "username": username, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.body["data"].clone()
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0 Safari/537.36")
            .header("X-Forwarded-For", FORWARDED_FOR);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let mut req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        req.extensions_mut().insert(ConnectInfo(PEER));

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

fn account(username: &str, hash: &str, roles: &[&str]) -> AccountConfig {
    AccountConfig {
        user_id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash: hash.to_string(),
        dept_id: Some("100".to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        disabled: false,
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The machine-readable error code of an error response
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Extracts a string field from a JSON object
pub fn text<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing field {field} in {value}"))
}
