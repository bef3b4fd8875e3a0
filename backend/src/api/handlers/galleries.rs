//! Gallery management handlers. All routes require authentication and only
//! ever see the caller's own galleries.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::dto::{ApiJson, ApiPath, ApiQuery, SuccessResponse};
use crate::api::middleware::auth::AuthExtension;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::gallery::{Gallery, GalleryStats, GalleryStatus, GalleryWithImages};
use crate::services::gallery_service::{
    CreateGalleryInput, GalleryService, ListGalleriesQuery, UpdateGalleryInput,
};
use crate::services::photographer_service::PhotographerService;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_galleries).post(create_gallery))
        .route(
            "/:id",
            get(get_gallery).patch(update_gallery).delete(delete_gallery),
        )
        .route("/:id/status", put(update_gallery_status))
        .route("/:id/stats", get(get_gallery_stats))
}

fn service(state: &SharedState) -> GalleryService {
    GalleryService::new(state.db.clone(), state.config.bcrypt_cost)
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: GalleryStatus,
}

async fn create_gallery(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiJson(payload): ApiJson<CreateGalleryInput>,
) -> Result<(StatusCode, Json<Gallery>)> {
    PhotographerService::new(state.db.clone())
        .ensure_exists(&auth)
        .await?;
    let gallery = service(&state).create(auth.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(gallery)))
}

async fn list_galleries(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiQuery(query): ApiQuery<ListGalleriesQuery>,
) -> Result<Json<Vec<GalleryWithImages>>> {
    let galleries = service(&state).list(auth.user_id, query).await?;
    Ok(Json(galleries))
}

async fn get_gallery(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<GalleryWithImages>> {
    let gallery = service(&state).get_by_id(id, auth.user_id).await?;
    Ok(Json(gallery))
}

async fn update_gallery(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateGalleryInput>,
) -> Result<Json<Gallery>> {
    let gallery = service(&state).update(id, auth.user_id, payload).await?;
    Ok(Json(gallery))
}

async fn update_gallery_status(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Gallery>> {
    let gallery = service(&state)
        .update_status(id, auth.user_id, payload.status)
        .await?;
    Ok(Json(gallery))
}

async fn delete_gallery(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>> {
    service(&state).delete(id, auth.user_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn get_gallery_stats(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<GalleryStats>> {
    let stats = service(&state).get_stats(id, auth.user_id).await?;
    Ok(Json(stats))
}
