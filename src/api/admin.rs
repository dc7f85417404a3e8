//! Admin session endpoints.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::token_from_headers;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

/// POST /api/admin/login - Exchange the admin email/password for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let token = state.admin.login(&request.email, &request.password).await?;
    success(LoginResponse { token })
}

/// POST /api/admin/logout - Revoke the presented token.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    if let Some(token) = token_from_headers(&headers) {
        if state.admin.logout(&token).await {
            tracing::info!("Admin session closed");
        }
    }
    success(())
}

/// GET /api/admin/status - Whether the presented token is an active admin session.
pub async fn admin_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<AdminStatus> {
    let token = token_from_headers(&headers);
    success(AdminStatus {
        admin: state.admin.is_admin(token.as_deref()).await,
    })
}
