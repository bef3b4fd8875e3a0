//! Galleria - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use galleria_backend::{
    api::{self, AppState},
    config::Config,
    db,
    error::{AppError, Result},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    telemetry::init_tracing();

    let config = Config::from_env()?;
    tracing::info!(environment = %config.environment, "Starting Galleria");
    if config.is_development() && config.cors_origin.trim() == "*" {
        tracing::warn!("CORS_ORIGIN is '*'; any origin may call the API");
    }

    let db_pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Connected to database");

    db::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    let cors = cors_layer(&config)?;
    let addr: SocketAddr = config.bind_address.parse()?;

    let state = Arc::new(AppState::new(config, db_pool));

    let app = api::routes::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Any origin unless `CORS_ORIGIN` names specific ones (comma separated).
/// Credentials are only allowed with an explicit origin list.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if config.cors_origin.trim() == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origin
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<HeaderValue>()
                .map_err(|_| AppError::Config(format!("Invalid CORS origin: {}", s.trim())))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true))
}
