//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/login` - Credential login, returns a token pair
/// - `POST /api/auth/refresh` - Rotate the refresh token (bearer required)
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/refresh", post(handlers::refresh))
}
