//! Authentication data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every access token
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    /// Token ID linking this access token to the refresh-token generation
    /// that produced it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// User ID
    pub sub: String,
    pub email: String,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// Decoded payload of a self-contained refresh token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RefreshTokenPayload {
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/auth/login request body
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/refresh request body
#[derive(Deserialize, Debug)]
pub struct RefreshRequest {
    pub token: String,
}

/// Access/refresh token pair returned to the caller. Never persisted as its
/// own entity; the refresh token value is also cached on the user record.
#[derive(Serialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}
