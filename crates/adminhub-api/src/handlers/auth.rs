//! Auth handlers: login, refresh, logout, me.

use axum::Json;
use axum::extract::State;
use tracing::info;

use adminhub_auth::principal::Principal;

use crate::dto::request::{LoginRequest, RefreshRequest, validate_body};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientDevice};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientDevice(device): ClientDevice,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    validate_body(&req)?;

    let principal = state
        .principal_resolver
        .resolve(&req.username, &req.password)
        .await?;

    let tokens = state
        .session_manager
        .create_session(&principal, &device)
        .await?;

    info!(
        user_id = %principal.user_id,
        client_ip = %device.client_ip,
        "User logged in"
    );

    Ok(Json(ApiResponse::ok(LoginResponse {
        tokens: tokens.into(),
        user: principal,
    })))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ClientDevice(device): ClientDevice,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    validate_body(&req)?;

    let tokens = state
        .session_manager
        .rotate_refresh(&req.refresh_token, &device)
        .await?;

    Ok(Json(ApiResponse::ok(tokens.into())))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.session_manager.invalidate(&auth.token).await?;

    info!(user_id = %auth.user_id, "User logged out");

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<Principal>> {
    Json(ApiResponse::ok(auth.principal))
}
