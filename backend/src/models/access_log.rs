//! Append-only client access and download logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One client view of a shared gallery.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryAccess {
    pub id: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub accessed_at: DateTime<Utc>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub gallery_id: Uuid,
}

/// One client download of an image.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDownload {
    pub id: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub downloaded_at: DateTime<Utc>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub image_id: Uuid,
    pub gallery_id: Uuid,
}

/// Network details of the requester, taken from the HTTP request.
#[derive(Debug, Clone, Default)]
pub struct RequesterInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Identity a client may volunteer when opening a shared gallery.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    pub client_name: Option<String>,
    pub client_email: Option<String>,
}
