use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app::AppState;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
}

/// POST /login - check credentials and return the user record
///
/// Expected Input:
/// ```json
/// { "user": "string", "password": "string" }
/// ```
///
/// Any failure, a missing or malformed body included, is a bare 401; no
/// session is opened.
pub async fn standard_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(payload) = payload.map_err(|e| {
        warn!("Rejected login body: {}", e.body_text());
        ApiError::unauthorized("Invalid credentials")
    })?;

    let user = state
        .login
        .standard_login(&payload.user, &payload.password)
        .await?;

    Ok(ApiResponse::success(LoginResponse { user }))
}
