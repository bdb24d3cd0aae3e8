//! Integration tests for the login, refresh, and logout flow.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;

use adminhub_core::error::AppError;
use adminhub_core::events::SessionEvent;
use adminhub_core::result::AppResult;
use adminhub_core::traits::cache::CacheProvider;

use crate::helpers::{FORWARDED_FOR, PEER, TestApp, text};

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new(false);
    let data = app.login("alice").await;

    assert_eq!(text(&data, "token_type"), "Bearer");
    assert!(!text(&data, "refresh_token").is_empty());
    assert_eq!(data["user"]["principalName"], "alice");

    let response = app
        .request("GET", "/api/auth/me", None, Some(text(&data, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["principalName"], "alice");
    assert_eq!(response.body["data"]["deptId"], "100");
}

#[tokio::test]
async fn test_login_records_device_metadata() {
    let app = TestApp::new(false);
    app.login("bob").await;

    let sessions = app.manager.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].client_ip, FORWARDED_FOR);
    assert_eq!(sessions[0].geo_region, "Intranet");
    assert_eq!(sessions[0].os, "Windows 10");
    assert_eq!(sessions[0].browser, "Chrome 120");
}

#[tokio::test]
async fn test_forwarded_for_ignored_from_untrusted_peer() {
    let app = TestApp::without_trusted_proxy();
    app.login("alice").await;

    let sessions = app.manager.list_sessions().await.unwrap();
    assert_eq!(sessions[0].client_ip, PEER.ip().to_string());
    assert_ne!(sessions[0].client_ip, FORWARDED_FOR);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new(false);
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "username": "alice", "password": "nope" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTHENTICATION");
}

#[tokio::test]
async fn test_login_requires_username() {
    let app = TestApp::new(false);
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "username": "", "password": "x" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_rejects_missing_and_bad_tokens() {
    let app = TestApp::new(false);

    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/auth/me", None, Some("not.a-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "TOKEN_MALFORMED");
}

#[tokio::test]
async fn test_refresh_supersedes_access_token() {
    let app = TestApp::new(false);
    let login = app.login("alice").await;
    let old_access = text(&login, "access_token");
    let refresh = text(&login, "refresh_token");

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let rotated = &response.body["data"];
    assert_eq!(text(rotated, "refresh_token"), refresh);

    let response = app.request("GET", "/api/auth/me", None, Some(old_access)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "SESSION_NOT_FOUND");

    let response = app
        .request("GET", "/api/auth/me", None, Some(text(rotated, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_with_access_token_is_rejected() {
    let app = TestApp::new(false);
    let login = app.login("alice").await;

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": text(&login, "access_token") })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "REFRESH_TOKEN_INVALID");
}

#[tokio::test]
async fn test_logout_then_refresh_is_stale() {
    let app = TestApp::new(true);
    let login = app.login("alice").await;
    let access = text(&login, "access_token");

    let response = app.request("POST", "/api/auth/logout", None, Some(access)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/auth/me", None, Some(access)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": text(&login, "refresh_token") })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "USER_SESSION_STALE");
}

#[tokio::test]
async fn test_single_login_evicts_first_session() {
    let app = TestApp::new(true);
    let first = app.login("alice").await;
    let second = app.login("alice").await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(text(&first, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/auth/me", None, Some(text(&second, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert!(
        app.auditor
            .payloads()
            .iter()
            .any(|e| matches!(e, SessionEvent::Evicted { .. }))
    );
}

#[tokio::test]
async fn test_other_users_are_not_evicted() {
    let app = TestApp::new(true);
    let alice = app.login("alice").await;
    app.login("bob").await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(text(&alice, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

/// Backend that never answers in time.
#[derive(Debug)]
struct HangingProvider;

#[async_trait]
impl CacheProvider for HangingProvider {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::internal("connection reset"))
    }
    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::internal("connection reset"))
    }
    async fn expire(&self, _key: &str, _ttl: Duration) -> AppResult<bool> {
        Err(AppError::internal("connection reset"))
    }
    async fn ttl(&self, _key: &str) -> AppResult<Option<Duration>> {
        Err(AppError::internal("connection reset"))
    }
    async fn keys(&self, _prefix: &str) -> AppResult<Vec<String>> {
        Err(AppError::internal("connection reset"))
    }
    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}

#[tokio::test]
async fn test_store_outage_is_service_unavailable() {
    let healthy = TestApp::new(false);
    let login = healthy.login("alice").await;

    // Same signing secret, but a store that never answers.
    let down = TestApp::with_provider(false, Arc::new(HangingProvider));

    let response = down
        .request("GET", "/api/auth/me", None, Some(text(&login, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error_code(), "STORE_UNAVAILABLE");
    assert_eq!(response.body["retryable"], true);

    let response = down.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["data"]["status"], "degraded");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(false);
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
