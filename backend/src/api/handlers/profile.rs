//! Endpoints scoped to the authenticated photographer.

use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::api::middleware::auth::AuthExtension;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::user::Photographer;
use crate::services::photographer_service::PhotographerService;

pub fn router() -> Router<SharedState> {
    Router::new().route("/me", get(me))
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub message: String,
    pub user: SessionUser,
    /// Stored account row, absent when the provider has not synced it yet
    pub profile: Option<Photographer>,
}

/// Echo the caller's session identity.
async fn me(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
) -> Result<Json<MeResponse>> {
    let profile = PhotographerService::new(state.db.clone())
        .find(auth.user_id)
        .await?;

    Ok(Json(MeResponse {
        message: "This is private".to_string(),
        user: SessionUser {
            id: auth.user_id,
            email: auth.email,
            name: auth.name,
        },
        profile,
    }))
}
