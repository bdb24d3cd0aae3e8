//! Online-session monitor handlers (admin only).

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;

use crate::dto::response::{
    ApiResponse, MessageResponse, OnlineListResponse, OnlineSessionResponse,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/monitor/online
pub async fn list_online(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<OnlineListResponse>>, ApiError> {
    require_admin(&auth)?;

    let sessions: Vec<OnlineSessionResponse> = state
        .session_manager
        .list_sessions()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ApiResponse::ok(OnlineListResponse {
        total: sessions.len(),
        sessions,
    })))
}

/// DELETE /api/monitor/online/{token_id}
pub async fn force_logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(token_id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_admin(&auth)?;

    let record = state.session_manager.force_logout(&token_id).await?;

    info!(
        admin = %auth.user_id,
        user_id = %record.user_id,
        session_id = %token_id,
        "Admin forced logout"
    );

    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "Session of {} ended",
        record.principal_name
    )))))
}
