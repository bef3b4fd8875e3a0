//! Image handlers, nested under a gallery owned by the caller.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::dto::{ApiJson, ApiPath, SuccessResponse};
use crate::api::middleware::auth::AuthExtension;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::image::Image;
use crate::services::image_service::{AddImageInput, ImageService, UpdateImageInput};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/:id/images", post(add_image))
        .route(
            "/:id/images/:image_id",
            patch(update_image).delete(delete_image),
        )
}

async fn add_image(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiPath(gallery_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AddImageInput>,
) -> Result<(StatusCode, Json<Image>)> {
    let image = ImageService::new(state.db.clone())
        .add(gallery_id, auth.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

async fn update_image(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiPath((gallery_id, image_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<UpdateImageInput>,
) -> Result<Json<Image>> {
    let image = ImageService::new(state.db.clone())
        .update(gallery_id, image_id, auth.user_id, payload)
        .await?;
    Ok(Json(image))
}

async fn delete_image(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    ApiPath((gallery_id, image_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<SuccessResponse>> {
    ImageService::new(state.db.clone())
        .delete(gallery_id, image_id, auth.user_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
