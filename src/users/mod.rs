//! # Users Module
//!
//! Profile CRUD and picture upload, all gated on the caller-claims
//! verification performed by the token service.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod validators;


pub use models::User;
pub use routes::user_routes;
pub use service::{UploadConfig, UserService};
pub use store::UserStore;
