//! Login and token-refresh orchestration

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::extractors::CallerClaims;
use super::models::{LoginRequest, TokenResponse};
use super::password;
use super::tokens::TokenService;
use crate::common::{safe_email_log, safe_token_log, ApiError};
use crate::users::models::User;
use crate::users::store::UserStore;

pub struct AuthService {
    store: UserStore,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: UserStore, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Verify credentials and issue a fresh token pair.
    pub async fn login(
        &self,
        request: &LoginRequest,
        now: DateTime<Utc>,
    ) -> Result<TokenResponse, ApiError> {
        let mut user = self
            .store
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

        if !password::verify_password(&request.password, &user.password_hash) {
            warn!(
                email = %safe_email_log(&request.email),
                "Login rejected: password mismatch"
            );
            return Err(ApiError::InvalidCredentials);
        }

        let response = self.issue_tokens(&mut user, now).await?;

        info!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            "User logged in"
        );

        Ok(response)
    }

    /// Exchange a still-valid bearer token plus the matching refresh token
    /// for a fresh token pair, rotating the persisted refresh token.
    pub async fn refresh(
        &self,
        caller: &CallerClaims,
        presented_token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenResponse, ApiError> {
        // The bearer token must carry the token ID linking it to a refresh
        // generation; tokens issued without one cannot be refreshed.
        if caller.token_id.is_none() {
            warn!(user_id = %caller.user_id, "Refresh rejected: missing token ID claim");
            return Err(ApiError::Unauthorized("missing token claims".to_string()));
        }

        // Load by ID and independently by email. Either miss means the
        // claims point at a deleted account or a drifted email.
        let user = self.store.get_by_id(&caller.user_id).await?;
        let email_match = self.store.get_by_email(&caller.email).await?;
        let mut user = match (user, email_match) {
            (Some(u), Some(_)) => u,
            _ => return Err(ApiError::NotFound("user not found".to_string())),
        };

        // The presented token must be the one currently persisted; anything
        // else is a superseded or foreign refresh token.
        if user.refresh_token.as_deref() != Some(presented_token) {
            warn!(
                user_id = %user.id,
                token = %safe_token_log(presented_token),
                "Refresh rejected: token does not match persisted value"
            );
            return Err(ApiError::Unauthorized(
                "refresh token mismatch".to_string(),
            ));
        }

        let payload = self.tokens.decode_refresh_token(presented_token)?;
        if payload.expires_at <= now {
            return Err(ApiError::TokenExpired);
        }

        let response = self.issue_tokens(&mut user, now).await?;

        info!(user_id = %user.id, "Refresh token rotated");

        Ok(response)
    }

    /// Rotation point: generate a refresh token, persist it on the user
    /// record (overwriting any prior value), then issue an access token
    /// bound to the new generation's token ID.
    async fn issue_tokens(
        &self,
        user: &mut User,
        now: DateTime<Utc>,
    ) -> Result<TokenResponse, ApiError> {
        let refresh_token = self
            .tokens
            .generate_refresh_token(&user.id, &user.email, now)?;

        user.refresh_token = Some(refresh_token.clone());
        self.store.update(user).await?;

        let payload = self.tokens.decode_refresh_token(&refresh_token)?;
        let access_token =
            self.tokens
                .generate_access_token(&user.id, &user.email, now, &payload.token_id)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
        })
    }
}
