//! API module - HTTP handlers and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::config::Config;
use crate::services::auth_service::AuthService;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: SqlitePool,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let auth_service = Arc::new(AuthService::new(&config));
        Self {
            config,
            db,
            auth_service,
        }
    }
}

pub type SharedState = Arc<AppState>;
