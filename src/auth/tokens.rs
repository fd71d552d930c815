//! Token issuance and claims verification
//!
//! Access tokens are HS256-signed JWTs. Refresh tokens are self-contained
//! opaque values: a random 32-byte token ID plus an expiry, serialized and
//! base64-encoded. The token ID is mirrored into the `jti` claim of the
//! access token issued alongside it, which lets the authorization gate tie
//! a bearer token to the specific refresh-token generation that produced it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use thiserror::Error;
use tracing::debug;

use super::extractors::CallerClaims;
use super::models::{Claims, RefreshTokenPayload};
use crate::common::safe_email_log;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed refresh token: {0}")]
    Malformed(#[from] base64::DecodeError),

    #[error("invalid refresh token payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Token configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

#[derive(Debug, Clone)]
pub struct TokenService {
    config: JwtConfig,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Build a signed, time-bound access token embedding the user identity
    /// and the token ID of the current refresh-token generation.
    pub fn generate_access_token(
        &self,
        user_id: &str,
        email: &str,
        issued_at: DateTime<Utc>,
        token_id: &str,
    ) -> Result<String, TokenError> {
        let expires_at = issued_at + Duration::minutes(self.config.access_ttl_minutes);

        let claims = Claims {
            jti: Some(token_id.to_string()),
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: expires_at.timestamp() as usize,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Produce a new opaque refresh token: a random 32-byte token ID and an
    /// expiry, serialized then base64-encoded. This value is returned to the
    /// caller verbatim and persisted on the user record.
    pub fn generate_refresh_token(
        &self,
        user_id: &str,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = issued_at + Duration::days(self.config.refresh_ttl_days);

        let mut random_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let payload = RefreshTokenPayload {
            token_id: BASE64.encode(random_bytes),
            expires_at,
        };

        debug!(
            user_id = %user_id,
            email = %safe_email_log(email),
            expires_at = %expires_at,
            "Issuing refresh token"
        );

        let serialized = serde_json::to_vec(&payload)?;
        Ok(BASE64.encode(serialized))
    }

    /// Inverse of the refresh-token encode step. Expiry is deliberately not
    /// checked here; call sites compare it against their own clock.
    pub fn decode_refresh_token(&self, token: &str) -> Result<RefreshTokenPayload, TokenError> {
        let bytes = BASE64.decode(token)?;
        let payload: RefreshTokenPayload = serde_json::from_slice(&bytes)?;
        Ok(payload)
    }

    /// Verify that the caller's bearer-token claims match the target identity
    /// and the refresh-token generation currently persisted for it.
    ///
    /// Returns true iff the caller's subject equals the target user ID, the
    /// caller's email equals the target email case-insensitively, and the
    /// caller's `jti` equals the token ID decoded from `refresh_token`. A
    /// caller holding a bearer token from before the user's last refresh
    /// fails the third check.
    pub fn verify_caller_claims(
        &self,
        caller: &CallerClaims,
        target_user_id: &str,
        target_email: &str,
        refresh_token: &str,
    ) -> Result<bool, TokenError> {
        let payload = self.decode_refresh_token(refresh_token)?;

        Ok(caller.user_id == target_user_id
            && caller.email.eq_ignore_ascii_case(target_email)
            && caller.token_id.as_deref() == Some(payload.token_id.as_str()))
    }

    /// Decoding key and validation rules shared with the bearer-token extractor
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.config.secret.as_bytes())
    }

    pub fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation
    }

    /// Decode and validate an access token (signature, expiry, issuer,
    /// audience) and return its claims.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key(), &self.validation())?;
        Ok(data.claims)
    }
}
