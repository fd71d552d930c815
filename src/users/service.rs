//! Profile CRUD and picture upload, gated on caller-claims verification

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::models::{
    PictureUpload, ProfileDto, RegisterRequest, UpdateProfileRequest, UploadPictureResponse, User,
};
use super::store::UserStore;
use crate::auth::extractors::CallerClaims;
use crate::auth::password;
use crate::auth::tokens::TokenService;
use crate::common::{generate_raw_id, generate_user_id, safe_email_log, ApiError};
use crate::services::StorageService;

/// Upload limits, loaded once at startup
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_image_size_mb: u64,
    /// Allowed formats, uppercased (e.g. ["PNG", "JPEG", "JPG"])
    pub allowed_formats: Vec<String>,
}

impl UploadConfig {
    /// Parse a delimited allow-list ("PNG/JPEG/JPG") into config
    pub fn new(max_image_size_mb: u64, allowed_formats: &str) -> Self {
        Self {
            max_image_size_mb,
            allowed_formats: allowed_formats
                .split('/')
                .map(|f| f.trim().to_uppercase())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }
}

pub struct UserService {
    store: UserStore,
    tokens: TokenService,
    storage: Arc<StorageService>,
    upload: UploadConfig,
}

impl UserService {
    pub fn new(
        store: UserStore,
        tokens: TokenService,
        storage: Arc<StorageService>,
        upload: UploadConfig,
    ) -> Self {
        Self {
            store,
            tokens,
            storage,
            upload,
        }
    }

    /// Create a new account. The email must not already be registered.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        if self.store.get_by_email(&request.email).await?.is_some() {
            warn!(
                email = %safe_email_log(&request.email),
                "Registration rejected: email already exists"
            );
            return Err(ApiError::EmailAlreadyExists);
        }

        let user = User {
            id: generate_user_id(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            password_hash: password::hash_password(&request.password)?,
            profile_picture_url: None,
            refresh_token: None,
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
        };

        self.store.add(&user).await?;

        info!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            "User registered"
        );

        Ok(())
    }

    pub async fn get_profile(
        &self,
        caller: &CallerClaims,
        user_id: &str,
        email: &str,
    ) -> Result<ProfileDto, ApiError> {
        let user = self.load_user(user_id).await?;
        self.authorize(caller, &user, user_id, email)?;

        Ok(user.to_dto())
    }

    pub async fn update_profile(
        &self,
        caller: &CallerClaims,
        request: &UpdateProfileRequest,
    ) -> Result<ProfileDto, ApiError> {
        let mut user = self.load_user(&request.user_id).await?;
        self.authorize(caller, &user, &request.user_id, &request.email)?;

        user.first_name = request.first_name.clone();
        user.last_name = request.last_name.clone();
        user.updated_at = Some(Utc::now().to_rfc3339());

        // Re-hash only when the caller actually supplied a new password
        if let Some(new_password) = request.password.as_deref() {
            if !new_password.is_empty() {
                user.password_hash = password::hash_password(new_password)?;
            }
        }

        self.store.update(&user).await?;

        info!(user_id = %user.id, "Profile updated");

        Ok(user.to_dto())
    }

    pub async fn upload_picture(
        &self,
        caller: &CallerClaims,
        user_id: &str,
        email: &str,
        upload: &PictureUpload,
    ) -> Result<UploadPictureResponse, ApiError> {
        let mut user = self.load_user(user_id).await?;
        self.authorize(caller, &user, user_id, email)?;

        let format = validate_picture(upload, &self.upload)?;

        let key = format!(
            "avatars/{}_{}.{}",
            user.id,
            generate_raw_id(8),
            format.to_lowercase()
        );
        let content_type = upload
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let blob = self
            .storage
            .upload(upload.data.clone(), &key, &content_type)
            .await
            .map_err(|e| ApiError::StorageError(e.to_string()))?;

        user.profile_picture_url = Some(blob.uri.clone());
        user.updated_at = Some(Utc::now().to_rfc3339());
        self.store.update(&user).await?;

        info!(user_id = %user.id, key = %blob.name, "Profile picture updated");

        Ok(UploadPictureResponse {
            user_id: user.id,
            profile_picture_url: blob.uri,
        })
    }

    async fn load_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.store
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
    }

    /// The authorization gate shared by every profile operation: the caller
    /// may only act on the account whose persisted refresh-token generation
    /// matches their bearer token.
    fn authorize(
        &self,
        caller: &CallerClaims,
        user: &User,
        target_user_id: &str,
        target_email: &str,
    ) -> Result<(), ApiError> {
        let stored_token = match user.refresh_token.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => {
                warn!(user_id = %user.id, "Authorization rejected: no active session");
                return Err(ApiError::Unauthorized("no active session".to_string()));
            }
        };

        let verified =
            self.tokens
                .verify_caller_claims(caller, target_user_id, target_email, stored_token)?;

        if !verified {
            warn!(
                user_id = %user.id,
                caller_id = %caller.user_id,
                "Authorization rejected: claims mismatch"
            );
            return Err(ApiError::Unauthorized("claims mismatch".to_string()));
        }

        Ok(())
    }
}

/// Validate an incoming picture against the configured limits. Size and
/// format are independent checks with distinguishable error kinds; size is
/// checked first. Returns the accepted format (uppercased).
pub fn validate_picture(
    upload: &PictureUpload,
    config: &UploadConfig,
) -> Result<String, ApiError> {
    let max_bytes = config.max_image_size_mb * 1024 * 1024;
    if upload.data.len() as u64 > max_bytes {
        return Err(ApiError::InvalidImageSize(config.max_image_size_mb));
    }

    let format = picture_format(upload)
        .ok_or_else(|| ApiError::InvalidImageFormat(config.allowed_formats.join("/")))?;

    if !config.allowed_formats.contains(&format) {
        return Err(ApiError::InvalidImageFormat(config.allowed_formats.join("/")));
    }

    Ok(format)
}

/// Derive the declared format, uppercased: the content-type subtype when one
/// was sent, the filename extension otherwise.
fn picture_format(upload: &PictureUpload) -> Option<String> {
    if let Some(content_type) = upload.content_type.as_deref() {
        if let Some(subtype) = content_type.split('/').nth(1) {
            return Some(subtype.to_uppercase());
        }
    }

    let extension = upload.file_name.rsplit('.').next()?;
    if extension == upload.file_name {
        // No dot in the filename, nothing to derive a format from
        return None;
    }

    Some(extension.to_uppercase())
}
