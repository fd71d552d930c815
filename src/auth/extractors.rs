//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::tokens::TokenService;
use crate::common::{safe_email_log, ApiError, AppState};

/// Verified identity claims of the current caller.
///
/// Produced by the bearer-token extractor at the boundary and passed
/// explicitly into service calls; services never read ambient request state.
#[derive(Debug, Clone)]
pub struct CallerClaims {
    /// Token ID of the refresh-token generation the bearer token belongs to
    pub token_id: Option<String>,
    pub user_id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerClaims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Extension containing the AppState
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        // Extract Bearer token from Authorization header
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let token = match token {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        // Handle "Bearer <token>" format or raw token
        let bare_token = if let Some(rest) = token.strip_prefix("Bearer ") {
            rest.to_string()
        } else {
            token
        };

        // Validate signature, expiry, issuer and audience
        let tokens = TokenService::new(app_state.jwt.clone());
        let claims = match tokens.decode_access_token(&bare_token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "JWT token validation failed");
                return Err(ApiError::Unauthorized("invalid token".into()));
            }
        };

        debug!(
            user_id = %claims.sub,
            email = %safe_email_log(&claims.email),
            "Caller authenticated via bearer token"
        );

        Ok(CallerClaims {
            token_id: claims.jti,
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
