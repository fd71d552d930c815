// Application state shared across all modules

use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::auth::tokens::JwtConfig;
use crate::users::service::UserService;

/// Application state containing the services and the token configuration
/// consumed by the bearer-token extractor. The database pool lives inside
/// `UserStore`; nothing else queries it directly.
#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtConfig,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
}
