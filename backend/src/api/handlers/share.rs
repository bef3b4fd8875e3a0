//! Public share-link handlers. No session required; access is gated by the
//! gallery's status and optional password.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header::USER_AGENT, HeaderMap},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::api::dto::{ApiJson, ApiPath};
use crate::api::SharedState;
use crate::error::Result;
use crate::models::access_log::RequesterInfo;
use crate::services::share_service::{
    DownloadDescriptor, PublicGallery, ShareRequest, ShareService,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/:id", post(view_gallery))
        .route("/:id/images/:image_id/download", post(download_image))
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the
/// socket peer when the server was started with connect info.
fn requester_info(headers: &HeaderMap, peer: Option<SocketAddr>) -> RequesterInfo {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let ip_address = header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| header("x-real-ip").map(str::to_string))
        .or_else(|| peer.map(|addr| addr.ip().to_string()));

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    RequesterInfo {
        ip_address,
        user_agent,
    }
}

async fn view_gallery(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<ShareRequest>,
) -> Result<Json<PublicGallery>> {
    let requester = requester_info(&headers, peer.map(|ConnectInfo(addr)| addr));
    let gallery = ShareService::new(state.db.clone())
        .view(id, payload, requester)
        .await?;
    Ok(Json(gallery))
}

async fn download_image(
    State(state): State<SharedState>,
    ApiPath((id, image_id)): ApiPath<(Uuid, Uuid)>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<ShareRequest>,
) -> Result<Json<DownloadDescriptor>> {
    let requester = requester_info(&headers, peer.map(|ConnectInfo(addr)| addr));
    let descriptor = ShareService::new(state.db.clone())
        .download(id, image_id, payload, requester)
        .await?;
    Ok(Json(descriptor))
}
