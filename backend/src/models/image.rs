//! Image model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Image entity. Always belongs to exactly one gallery.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    /// File size in bytes
    pub size: i64,

    pub width: Option<i32>,
    pub height: Option<i32>,
    pub exif_data: Option<Json<serde_json::Value>>,

    /// Path inside the gallery's storage provider
    pub storage_path: String,
    pub thumbnail_path: Option<String>,
    pub preview_path: Option<String>,

    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Json<Vec<String>>>,
    pub is_hidden: bool,
    pub sort_order: i32,

    pub is_processed: bool,
    pub processing_error: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub captured_at: Option<DateTime<Utc>>,

    pub gallery_id: Uuid,
}

/// Column list matching [`Image`]'s `FromRow` layout.
pub const IMAGE_COLUMNS: &str = "id, filename, original_name, mime_type, size, \
    width, height, exif_data, storage_path, thumbnail_path, preview_path, \
    title, description, tags, is_hidden, sort_order, is_processed, processing_error, \
    created_at, updated_at, captured_at, gallery_id";
