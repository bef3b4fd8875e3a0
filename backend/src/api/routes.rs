//! Route definitions for the API.

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};

use super::handlers;
use super::middleware::auth::auth_middleware;
use super::middleware::tracing::request_id_middleware;
use super::SharedState;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api_v1_routes(state.clone()))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// API v1 routes
fn api_v1_routes(state: SharedState) -> Router<SharedState> {
    let auth_service = state.auth_service.clone();

    Router::new()
        // Public share links, gated by gallery status and password
        .nest("/share", handlers::share::router())
        // Photographer session routes
        .merge(
            handlers::profile::router().layer(middleware::from_fn_with_state(
                auth_service.clone(),
                auth_middleware,
            )),
        )
        .nest(
            "/galleries",
            handlers::galleries::router()
                .merge(handlers::images::router())
                .layer(middleware::from_fn_with_state(
                    auth_service,
                    auth_middleware,
                )),
        )
}
