// src/users/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the user router
///
/// # Routes
/// - `POST /api/user/profile` - Register a new account (anonymous)
/// - `GET  /api/user/profile` - Fetch a profile (bearer required)
/// - `PUT  /api/user/profile` - Update a profile (bearer required)
/// - `POST /api/user/profile-picture` - Upload a profile picture (bearer required)
pub fn user_routes() -> Router {
    Router::new()
        .route(
            "/api/user/profile",
            get(handlers::get_profile)
                .post(handlers::register)
                .put(handlers::update_profile),
        )
        .route("/api/user/profile-picture", post(handlers::upload_picture))
}
