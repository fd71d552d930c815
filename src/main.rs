// src/main.rs
use axum::{extract::Extension, Router};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod common;
mod services;
mod users;

use auth::tokens::{JwtConfig, TokenService};
use auth::AuthService;
use common::AppState;
use services::{StorageConfig, StorageService};
use users::{UploadConfig, UserService, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://account_api.db".to_string());

    let jwt = JwtConfig {
        secret: env::var("JWT_SECRET")
            .unwrap_or_else(|_| "replace_with_strong_secret".to_string()),
        issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "account-api".to_string()),
        audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "account-api-clients".to_string()),
        access_ttl_minutes: env::var("JWT_TOKEN_VALIDITY_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15),
        refresh_ttl_days: env::var("JWT_REFRESH_TOKEN_EXPIRY_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7),
    };

    let upload = UploadConfig::new(
        env::var("MAX_IMAGE_SIZE_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5),
        &env::var("ALLOWED_IMAGE_FORMATS").unwrap_or_else(|_| "PNG/JPEG/JPG".to_string()),
    );

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let storage_config = match StorageConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Blob storage not configured; picture uploads will fail");
            StorageConfig {
                access_key_id: String::new(),
                secret_access_key: String::new(),
                region: "us-east-1".to_string(),
                bucket_name: String::new(),
                cloudfront_domain: None,
            }
        }
    };
    let storage = Arc::new(StorageService::new(storage_config));
    info!("StorageService initialized");

    let store = UserStore::new(pool);
    let tokens = TokenService::new(jwt.clone());

    let auth_service = Arc::new(AuthService::new(store.clone(), tokens.clone()));
    info!("AuthService initialized");

    let user_service = Arc::new(UserService::new(
        store,
        tokens,
        storage,
        upload,
    ));
    info!("UserService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        jwt,
        auth_service,
        user_service,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        .merge(auth::auth_routes())
        .merge(users::user_routes())
        .layer(Extension(shared.clone()))
        .layer({
            let cors_origins = std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string());

            let origins: Vec<axum::http::HeaderValue> = cors_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
