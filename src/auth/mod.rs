//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Credential login and refresh-token rotation
//! - Access/refresh token generation and claims verification
//! - Password hashing
//! - CallerClaims extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use extractors::CallerClaims;
pub use routes::auth_routes;
pub use service::AuthService;
pub use tokens::TokenService;
