//! User profile handlers

use axum::extract::{Extension, Json, Multipart, Query};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{
    GetProfileQuery, PictureUpload, ProfileResponse, RegisterRequest, UpdateProfileRequest,
    UploadPictureResponse,
};
use super::validators::{RegisterValidator, UpdateProfileValidator};
use crate::auth::CallerClaims;
use crate::common::{safe_email_log, ApiError, AppState, Validator};

/// POST /api/user/profile
/// Registers a new account (anonymous)
pub async fn register(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = RegisterValidator.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    state.user_service.register(&payload).await?;

    info!(email = %safe_email_log(&payload.email), "Registration completed");

    Ok(Json(serde_json::json!({
        "message": "User created successfully"
    })))
}

/// GET /api/user/profile?user_id=&email=
/// Returns the target account's profile, if the caller's claims match it
pub async fn get_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    caller: CallerClaims,
    Query(query): Query<GetProfileQuery>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = state
        .user_service
        .get_profile(&caller, &query.user_id, &query.email)
        .await?;

    Ok(Json(ProfileResponse { user }))
}

/// PUT /api/user/profile
/// Updates name (and optionally password) on the target account
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    caller: CallerClaims,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = UpdateProfileValidator.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let user = state.user_service.update_profile(&caller, &payload).await?;

    Ok(Json(ProfileResponse { user }))
}

/// POST /api/user/profile-picture
/// Multipart upload: `user_id` and `email` text fields plus a `picture` file
pub async fn upload_picture(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    caller: CallerClaims,
    mut multipart: Multipart,
) -> Result<Json<UploadPictureResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let mut user_id: Option<String> = None;
    let mut email: Option<String> = None;
    let mut picture: Option<PictureUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?
    {
        match field.name() {
            Some("user_id") => {
                user_id = Some(field.text().await.map_err(|_| {
                    ApiError::BadRequest("Failed to read user_id field".to_string())
                })?);
            }
            Some("email") => {
                email = Some(field.text().await.map_err(|_| {
                    ApiError::BadRequest("Failed to read email field".to_string())
                })?);
            }
            Some("picture") => {
                let file_name = field
                    .file_name()
                    .ok_or_else(|| ApiError::BadRequest("No filename provided".to_string()))?
                    .to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = field.bytes().await.map_err(|_| {
                    ApiError::BadRequest("Failed to read file data".to_string())
                })?;

                picture = Some(PictureUpload {
                    data: data.to_vec(),
                    file_name,
                    content_type,
                });
            }
            _ => {}
        }
    }

    let user_id =
        user_id.ok_or_else(|| ApiError::BadRequest("Missing user_id field".to_string()))?;
    let email = email.ok_or_else(|| ApiError::BadRequest("Missing email field".to_string()))?;
    let picture =
        picture.ok_or_else(|| ApiError::BadRequest("No picture file found".to_string()))?;

    info!(
        user_id = %user_id,
        file = %picture.file_name,
        size = picture.data.len(),
        "Picture upload initiated"
    );

    let response = state
        .user_service
        .upload_picture(&caller, &user_id, &email, &picture)
        .await?;

    Ok(Json(response))
}
