//! Authentication handlers

use axum::extract::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::extractors::CallerClaims;
use super::models::{LoginRequest, RefreshRequest, TokenResponse};
use crate::common::{safe_email_log, safe_token_log, ApiError, AppState};

/// POST /api/auth/login
/// Verifies credentials and returns an access/refresh token pair
///
/// # Request Body
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "..."
/// }
/// ```
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(email = %safe_email_log(&payload.email), "Login requested");

    let tokens = state.auth_service.login(&payload, Utc::now()).await?;

    Ok(Json(tokens))
}

/// POST /api/auth/refresh
/// Exchanges the caller's refresh token for a fresh token pair.
/// Requires a still-valid bearer token; its claims are matched against the
/// presented refresh token.
pub async fn refresh(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    caller: CallerClaims,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(
        user_id = %caller.user_id,
        token = %safe_token_log(&payload.token),
        "Token refresh requested"
    );

    let tokens = state
        .auth_service
        .refresh(&caller, &payload.token, Utc::now())
        .await?;

    Ok(Json(tokens))
}
