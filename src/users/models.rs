//! User data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User database model. Holds the password hash and the single live refresh
/// token, so it is never serialized directly; responses go through
/// [`ProfileDto`].
#[derive(FromRow, Debug, Clone)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture_url: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl User {
    /// Public view of the account, without credentials or token state
    pub fn to_dto(&self) -> ProfileDto {
        ProfileDto {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            profile_picture_url: self.profile_picture_url.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ProfileDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_picture_url: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// POST /api/user/profile request body (registration)
#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// GET /api/user/profile query parameters
#[derive(Deserialize, Debug)]
pub struct GetProfileQuery {
    pub user_id: String,
    pub email: String,
}

/// PUT /api/user/profile request body
#[derive(Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Re-hashed and stored only when present and non-empty
    pub password: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ProfileResponse {
    pub user: ProfileDto,
}

#[derive(Serialize, Debug)]
pub struct UploadPictureResponse {
    pub user_id: String,
    pub profile_picture_url: String,
}

/// An incoming profile-picture file, as extracted from the multipart body
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}
