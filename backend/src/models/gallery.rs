//! Gallery model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::image::Image;

/// Gallery publication status.
///
/// Any status may move to any other; only the move to `Active` has a side
/// effect (it stamps `published_at`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GalleryStatus {
    #[default]
    Draft,
    Active,
    Archived,
    Private,
}

impl GalleryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryStatus::Draft => "draft",
            GalleryStatus::Active => "active",
            GalleryStatus::Archived => "archived",
            GalleryStatus::Private => "private",
        }
    }
}

/// Where a gallery's files live. Only the selector is stored; provider
/// credentials and paths go in `storage_config`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StorageProvider {
    #[default]
    Local,
    GoogleDrive,
    Dropbox,
    S3,
    Onedrive,
}

/// Gallery entity
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub status: GalleryStatus,

    pub storage_provider: StorageProvider,
    pub storage_config: Option<Json<serde_json::Value>>,

    pub is_password_protected: bool,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub allow_downloads: bool,
    pub allow_comments: bool,

    pub cover_image_id: Option<Uuid>,
    pub theme: Option<Json<serde_json::Value>>,
    pub watermark_config: Option<Json<serde_json::Value>>,

    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_location: Option<String>,

    pub meta_description: Option<String>,
    pub tags: Option<Json<Vec<String>>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,

    pub photographer_id: Uuid,
}

/// Column list matching [`Gallery`]'s `FromRow` layout.
pub const GALLERY_COLUMNS: &str = "id, title, description, slug, status, \
    storage_provider, storage_config, is_password_protected, password_hash, \
    allow_downloads, allow_comments, cover_image_id, theme, watermark_config, \
    client_name, client_email, event_date, event_location, meta_description, tags, \
    created_at, updated_at, published_at, photographer_id";

/// A gallery together with some or all of its images.
///
/// Listing returns at most one (cover) image per gallery; a single-gallery
/// lookup returns all of them in display order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryWithImages {
    #[serde(flatten)]
    pub gallery: Gallery,
    pub images: Vec<Image>,
}

/// Per-gallery counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryStats {
    pub image_count: i64,
    pub access_count: i64,
    pub download_count: i64,
}
