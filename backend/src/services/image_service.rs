//! Image registration and display metadata for owned galleries.

use chrono::Utc;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::image::{Image, IMAGE_COLUMNS};
use crate::services::gallery_service::find_owned_gallery;
use crate::services::validation;

const IMAGE_NOT_FOUND: &str = "Image not found";

/// Request to register an image that already sits in the gallery's storage
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddImageInput {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub exif_data: Option<serde_json::Value>,
    pub storage_path: String,
    pub thumbnail_path: Option<String>,
    pub preview_path: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_hidden: bool,
    pub sort_order: Option<i32>,
    pub captured_at: Option<String>,
}

impl AddImageInput {
    fn validate(&self) -> Result<()> {
        validation::require_non_empty("filename", &self.filename)?;
        validation::require_non_empty("originalName", &self.original_name)?;
        validation::validate_mime_type(&self.mime_type)?;
        if self.size < 0 {
            return Err(AppError::Validation("size must not be negative".to_string()));
        }
        validation::require_non_empty("storagePath", &self.storage_path)?;
        validation::validate_dimension("width", self.width)?;
        validation::validate_dimension("height", self.height)?;
        if let Some(captured_at) = &self.captured_at {
            validation::parse_datetime("capturedAt", captured_at)?;
        }
        Ok(())
    }
}

/// Partial update of an image's display fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImageInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_hidden: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Image service
pub struct ImageService {
    db: SqlitePool,
}

impl ImageService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    async fn find_owned_image(
        &self,
        gallery_id: Uuid,
        image_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Image> {
        let sql = format!(
            r#"
            SELECT {}
            FROM images
            WHERE id = ?1
              AND gallery_id = ?2
              AND gallery_id IN (SELECT id FROM galleries WHERE photographer_id = ?3)
            "#,
            IMAGE_COLUMNS
        );
        sqlx::query_as::<_, Image>(&sql)
            .bind(image_id)
            .bind(gallery_id)
            .bind(caller_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(IMAGE_NOT_FOUND.to_string()))
    }

    /// Register an image in one of the caller's galleries
    pub async fn add(&self, gallery_id: Uuid, caller_id: Uuid, input: AddImageInput) -> Result<Image> {
        input.validate()?;
        find_owned_gallery(&self.db, gallery_id, caller_id).await?;

        let captured_at = input
            .captured_at
            .as_deref()
            .map(|v| validation::parse_datetime("capturedAt", v))
            .transpose()?;

        let sort_order = match input.sort_order {
            Some(order) => order,
            None => {
                let next = sqlx::query_scalar::<_, i64>(
                    "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM images WHERE gallery_id = ?1",
                )
                .bind(gallery_id)
                .fetch_one(&self.db)
                .await?;
                i32::try_from(next).map_err(|_| {
                    AppError::Validation(
                        "sortOrder is required: the gallery's highest position is at its limit"
                            .to_string(),
                    )
                })?
            }
        };

        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.db.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO images (
                id, filename, original_name, mime_type, size,
                width, height, exif_data,
                storage_path, thumbnail_path, preview_path,
                title, description, tags, is_hidden, sort_order,
                created_at, updated_at, captured_at, gallery_id
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17, ?18, ?19)
            RETURNING {}
            "#,
            IMAGE_COLUMNS
        );

        let image = sqlx::query_as::<_, Image>(&sql)
            .bind(id)
            .bind(&input.filename)
            .bind(&input.original_name)
            .bind(&input.mime_type)
            .bind(input.size)
            .bind(input.width)
            .bind(input.height)
            .bind(input.exif_data.map(Json))
            .bind(&input.storage_path)
            .bind(&input.thumbnail_path)
            .bind(&input.preview_path)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.tags.map(Json))
            .bind(input.is_hidden)
            .bind(sort_order)
            .bind(now)
            .bind(captured_at)
            .bind(gallery_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE galleries SET updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(gallery_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(gallery_id = %gallery_id, image_id = %image.id, filename = %image.filename, "Image added");

        Ok(image)
    }

    /// Update display fields of an image in one of the caller's galleries
    pub async fn update(
        &self,
        gallery_id: Uuid,
        image_id: Uuid,
        caller_id: Uuid,
        input: UpdateImageInput,
    ) -> Result<Image> {
        let existing = self.find_owned_image(gallery_id, image_id, caller_id).await?;

        let sql = format!(
            r#"
            UPDATE images
            SET title = ?2, description = ?3, tags = ?4, is_hidden = ?5, sort_order = ?6, updated_at = ?7
            WHERE id = ?1
            RETURNING {}
            "#,
            IMAGE_COLUMNS
        );

        let image = sqlx::query_as::<_, Image>(&sql)
            .bind(image_id)
            .bind(input.title.or(existing.title))
            .bind(input.description.or(existing.description))
            .bind(input.tags.map(Json).or(existing.tags))
            .bind(input.is_hidden.unwrap_or(existing.is_hidden))
            .bind(input.sort_order.unwrap_or(existing.sort_order))
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(IMAGE_NOT_FOUND.to_string()))?;

        Ok(image)
    }

    /// Remove an image from one of the caller's galleries
    pub async fn delete(&self, gallery_id: Uuid, image_id: Uuid, caller_id: Uuid) -> Result<()> {
        self.find_owned_image(gallery_id, image_id, caller_id).await?;

        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE galleries SET cover_image_id = NULL WHERE id = ?1 AND cover_image_id = ?2")
            .bind(gallery_id)
            .bind(image_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM images WHERE id = ?1 AND gallery_id = ?2")
            .bind(image_id)
            .bind(gallery_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(gallery_id = %gallery_id, image_id = %image_id, "Image deleted");

        Ok(())
    }
}
