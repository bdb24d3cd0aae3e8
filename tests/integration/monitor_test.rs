//! Integration tests for the online-session monitor.

use axum::http::StatusCode;

use crate::helpers::{TestApp, text};

#[tokio::test]
async fn test_online_listing_requires_admin() {
    let app = TestApp::new(false);
    let bob = app.login("bob").await;

    let response = app
        .request("GET", "/api/monitor/online", None, Some(text(&bob, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_online_listing() {
    let app = TestApp::new(false);
    app.login("bob").await;
    let alice = app.login("alice").await;

    let response = app
        .request("GET", "/api/monitor/online", None, Some(text(&alice, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let data = &response.body["data"];
    assert_eq!(data["total"], 2);
    let sessions = data["sessions"].as_array().unwrap();
    assert!(sessions.iter().any(|s| s["principalName"] == "bob"));
    assert!(sessions.iter().all(|s| s["clientIp"] == "10.1.2.3"));
}

#[tokio::test]
async fn test_admin_forces_logout() {
    let app = TestApp::new(false);
    let bob = app.login("bob").await;
    let alice = app.login("alice").await;
    let admin_token = text(&alice, "access_token");

    let sessions = app.manager.list_sessions().await.unwrap();
    let bob_session = sessions
        .iter()
        .find(|s| s.principal_name == "bob")
        .unwrap()
        .access_token_id
        .clone();

    let path = format!("/api/monitor/online/{bob_session}");
    let response = app.request("DELETE", &path, None, Some(admin_token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/auth/me", None, Some(text(&bob, "access_token")))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "SESSION_NOT_FOUND");

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": text(&bob, "refresh_token") })),
            None,
        )
        .await;
    assert_eq!(response.error_code(), "USER_SESSION_STALE");

    let response = app.request("DELETE", &path, None, Some(admin_token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
