//! Gallery service.
//!
//! Owner-scoped gallery CRUD. Every operation that touches an existing
//! gallery first looks it up by `(id, photographer_id)`; a miss is reported
//! as `NotFound` whether the gallery is absent or owned by someone else, so
//! non-owners cannot discover which ids exist.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::gallery::{
    Gallery, GalleryStats, GalleryStatus, GalleryWithImages, StorageProvider, GALLERY_COLUMNS,
};
use crate::models::image::{Image, IMAGE_COLUMNS};
use crate::services::auth_service::AuthService;
use crate::services::validation;

const GALLERY_NOT_FOUND: &str = "Gallery not found";
const SLUG_CONFLICT: &str = "A gallery with this slug already exists";

fn default_true() -> bool {
    true
}

/// Request to create a gallery
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryInput {
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    /// ISO 8601 datetime
    pub event_date: Option<String>,
    pub event_location: Option<String>,
    #[serde(default)]
    pub is_password_protected: bool,
    pub password: Option<String>,
    #[serde(default = "default_true")]
    pub allow_downloads: bool,
    #[serde(default)]
    pub allow_comments: bool,
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub storage_provider: StorageProvider,
    pub storage_config: Option<serde_json::Value>,
    pub theme: Option<serde_json::Value>,
    pub watermark_config: Option<serde_json::Value>,
    pub meta_description: Option<String>,
}

impl CreateGalleryInput {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            slug: slug.into(),
            client_name: None,
            client_email: None,
            event_date: None,
            event_location: None,
            is_password_protected: false,
            password: None,
            allow_downloads: true,
            allow_comments: false,
            tags: None,
            storage_provider: StorageProvider::Local,
            storage_config: None,
            theme: None,
            watermark_config: None,
            meta_description: None,
        }
    }

    fn validate(&self) -> Result<()> {
        validation::validate_title(&self.title)?;
        validation::validate_slug(&self.slug)?;
        if let Some(email) = &self.client_email {
            validation::validate_email("clientEmail", email)?;
        }
        if let Some(date) = &self.event_date {
            validation::parse_datetime("eventDate", date)?;
        }
        Ok(())
    }
}

/// Partial update. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGalleryInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub event_date: Option<String>,
    pub event_location: Option<String>,
    pub is_password_protected: Option<bool>,
    pub password: Option<String>,
    pub allow_downloads: Option<bool>,
    pub allow_comments: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub storage_provider: Option<StorageProvider>,
    pub storage_config: Option<serde_json::Value>,
    pub theme: Option<serde_json::Value>,
    pub watermark_config: Option<serde_json::Value>,
    pub meta_description: Option<String>,
    pub cover_image_id: Option<Uuid>,
}

impl UpdateGalleryInput {
    fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validation::validate_title(title)?;
        }
        if let Some(slug) = &self.slug {
            validation::validate_slug(slug)?;
        }
        if let Some(email) = &self.client_email {
            validation::validate_email("clientEmail", email)?;
        }
        if let Some(date) = &self.event_date {
            validation::parse_datetime("eventDate", date)?;
        }
        Ok(())
    }
}

/// Filter and pagination for listing galleries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListGalleriesQuery {
    pub status: Option<GalleryStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Look up a gallery by id, only if `caller_id` owns it.
pub(crate) async fn find_owned_gallery(
    db: &SqlitePool,
    id: Uuid,
    caller_id: Uuid,
) -> Result<Gallery> {
    let sql = format!(
        "SELECT {} FROM galleries WHERE id = ?1 AND photographer_id = ?2",
        GALLERY_COLUMNS
    );
    sqlx::query_as::<_, Gallery>(&sql)
        .bind(id)
        .bind(caller_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound(GALLERY_NOT_FOUND.to_string()))
}

/// The store's unique index on `(photographer_id, slug)` is the final word on
/// slug collisions; the application pre-check can lose a race against it.
fn map_slug_conflict(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(SLUG_CONFLICT.to_string())
        }
        _ => AppError::Database(e.to_string()),
    }
}

/// Gallery service
pub struct GalleryService {
    db: SqlitePool,
    bcrypt_cost: u32,
}

impl GalleryService {
    /// Create a new gallery service
    pub fn new(db: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    async fn slug_taken(&self, caller_id: Uuid, slug: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM galleries WHERE photographer_id = ?1 AND slug = ?2)",
        )
        .bind(caller_id)
        .bind(slug)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || AuthService::hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Create a gallery owned by `caller_id`
    pub async fn create(&self, caller_id: Uuid, input: CreateGalleryInput) -> Result<Gallery> {
        input.validate()?;

        if self.slug_taken(caller_id, &input.slug).await? {
            return Err(AppError::Conflict(SLUG_CONFLICT.to_string()));
        }

        let event_date = input
            .event_date
            .as_deref()
            .map(|d| validation::parse_datetime("eventDate", d))
            .transpose()?;

        let password_hash = match input.password.filter(|p| !p.is_empty()) {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let id = Uuid::new_v4();
        let now = Utc::now();

        let sql = format!(
            r#"
            INSERT INTO galleries (
                id, title, description, slug, status,
                storage_provider, storage_config,
                is_password_protected, password_hash, allow_downloads, allow_comments,
                theme, watermark_config,
                client_name, client_email, event_date, event_location,
                meta_description, tags,
                created_at, updated_at, photographer_id
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?20, ?21)
            RETURNING {}
            "#,
            GALLERY_COLUMNS
        );

        let gallery = sqlx::query_as::<_, Gallery>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.slug)
            .bind(GalleryStatus::Draft)
            .bind(input.storage_provider)
            .bind(input.storage_config.map(Json))
            .bind(input.is_password_protected)
            .bind(&password_hash)
            .bind(input.allow_downloads)
            .bind(input.allow_comments)
            .bind(input.theme.map(Json))
            .bind(input.watermark_config.map(Json))
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(event_date)
            .bind(&input.event_location)
            .bind(&input.meta_description)
            .bind(input.tags.map(Json))
            .bind(now)
            .bind(caller_id)
            .fetch_one(&self.db)
            .await
            .map_err(map_slug_conflict)?;

        tracing::info!(gallery_id = %gallery.id, photographer_id = %caller_id, slug = %gallery.slug, "Gallery created");

        Ok(gallery)
    }

    /// List the caller's galleries, most recently updated first, each with
    /// its first image for use as a cover thumbnail.
    pub async fn list(
        &self,
        caller_id: Uuid,
        query: ListGalleriesQuery,
    ) -> Result<Vec<GalleryWithImages>> {
        let (limit, offset) = validation::resolve_page(query.limit, query.offset)?;

        let sql = format!(
            r#"
            SELECT {}
            FROM galleries
            WHERE photographer_id = ?1
              AND (?2 IS NULL OR status = ?2)
            ORDER BY updated_at DESC, created_at DESC
            LIMIT ?3 OFFSET ?4
            "#,
            GALLERY_COLUMNS
        );

        let galleries = sqlx::query_as::<_, Gallery>(&sql)
            .bind(caller_id)
            .bind(query.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        let cover_sql = format!(
            "SELECT {} FROM images WHERE gallery_id = ?1 ORDER BY sort_order, created_at LIMIT 1",
            IMAGE_COLUMNS
        );

        let mut items = Vec::with_capacity(galleries.len());
        for gallery in galleries {
            let cover = sqlx::query_as::<_, Image>(&cover_sql)
                .bind(gallery.id)
                .fetch_optional(&self.db)
                .await?;
            items.push(GalleryWithImages {
                gallery,
                images: cover.into_iter().collect(),
            });
        }

        Ok(items)
    }

    /// Get one of the caller's galleries with all of its images
    pub async fn get_by_id(&self, id: Uuid, caller_id: Uuid) -> Result<GalleryWithImages> {
        let gallery = find_owned_gallery(&self.db, id, caller_id).await?;

        let sql = format!(
            "SELECT {} FROM images WHERE gallery_id = ?1 ORDER BY sort_order, created_at",
            IMAGE_COLUMNS
        );
        let images = sqlx::query_as::<_, Image>(&sql)
            .bind(id)
            .fetch_all(&self.db)
            .await?;

        Ok(GalleryWithImages { gallery, images })
    }

    /// Apply a partial update to one of the caller's galleries
    pub async fn update(
        &self,
        id: Uuid,
        caller_id: Uuid,
        input: UpdateGalleryInput,
    ) -> Result<Gallery> {
        input.validate()?;

        let existing = find_owned_gallery(&self.db, id, caller_id).await?;

        if let Some(slug) = &input.slug {
            if *slug != existing.slug && self.slug_taken(caller_id, slug).await? {
                return Err(AppError::Conflict(SLUG_CONFLICT.to_string()));
            }
        }

        if let Some(cover_id) = input.cover_image_id {
            let belongs: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM images WHERE id = ?1 AND gallery_id = ?2)",
            )
            .bind(cover_id)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
            if !belongs {
                return Err(AppError::Validation(
                    "coverImageId must reference an image in this gallery".to_string(),
                ));
            }
        }

        let event_date: Option<DateTime<Utc>> = match input.event_date.as_deref() {
            Some(d) => Some(validation::parse_datetime("eventDate", d)?),
            None => existing.event_date,
        };

        let password_hash = match input.password.filter(|p| !p.is_empty()) {
            Some(password) => Some(self.hash_password(password).await?),
            None => existing.password_hash,
        };

        let sql = format!(
            r#"
            UPDATE galleries
            SET title = ?3,
                description = ?4,
                slug = ?5,
                storage_provider = ?6,
                storage_config = ?7,
                is_password_protected = ?8,
                password_hash = ?9,
                allow_downloads = ?10,
                allow_comments = ?11,
                cover_image_id = ?12,
                theme = ?13,
                watermark_config = ?14,
                client_name = ?15,
                client_email = ?16,
                event_date = ?17,
                event_location = ?18,
                meta_description = ?19,
                tags = ?20,
                updated_at = ?21
            WHERE id = ?1 AND photographer_id = ?2
            RETURNING {}
            "#,
            GALLERY_COLUMNS
        );

        let gallery = sqlx::query_as::<_, Gallery>(&sql)
            .bind(id)
            .bind(caller_id)
            .bind(input.title.unwrap_or(existing.title))
            .bind(input.description.or(existing.description))
            .bind(input.slug.unwrap_or(existing.slug))
            .bind(input.storage_provider.unwrap_or(existing.storage_provider))
            .bind(input.storage_config.map(Json).or(existing.storage_config))
            .bind(
                input
                    .is_password_protected
                    .unwrap_or(existing.is_password_protected),
            )
            .bind(password_hash)
            .bind(input.allow_downloads.unwrap_or(existing.allow_downloads))
            .bind(input.allow_comments.unwrap_or(existing.allow_comments))
            .bind(input.cover_image_id.or(existing.cover_image_id))
            .bind(input.theme.map(Json).or(existing.theme))
            .bind(input.watermark_config.map(Json).or(existing.watermark_config))
            .bind(input.client_name.or(existing.client_name))
            .bind(input.client_email.or(existing.client_email))
            .bind(event_date)
            .bind(input.event_location.or(existing.event_location))
            .bind(input.meta_description.or(existing.meta_description))
            .bind(input.tags.map(Json).or(existing.tags))
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await
            .map_err(map_slug_conflict)?
            .ok_or_else(|| AppError::NotFound(GALLERY_NOT_FOUND.to_string()))?;

        tracing::debug!(gallery_id = %id, "Gallery updated");

        Ok(gallery)
    }

    /// Change a gallery's status.
    ///
    /// `published_at` is re-stamped on every move to `Active`, including when
    /// the gallery was already published.
    pub async fn update_status(
        &self,
        id: Uuid,
        caller_id: Uuid,
        status: GalleryStatus,
    ) -> Result<Gallery> {
        let existing = find_owned_gallery(&self.db, id, caller_id).await?;

        let now = Utc::now();
        let published_at = if status == GalleryStatus::Active {
            Some(now)
        } else {
            existing.published_at
        };

        let sql = format!(
            r#"
            UPDATE galleries
            SET status = ?3, published_at = ?4, updated_at = ?5
            WHERE id = ?1 AND photographer_id = ?2
            RETURNING {}
            "#,
            GALLERY_COLUMNS
        );

        let gallery = sqlx::query_as::<_, Gallery>(&sql)
            .bind(id)
            .bind(caller_id)
            .bind(status)
            .bind(published_at)
            .bind(now)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(GALLERY_NOT_FOUND.to_string()))?;

        tracing::info!(
            gallery_id = %id,
            from = existing.status.as_str(),
            to = status.as_str(),
            "Gallery status changed"
        );

        Ok(gallery)
    }

    /// Delete one of the caller's galleries. Images and access/download logs
    /// go with it through the foreign-key cascade.
    pub async fn delete(&self, id: Uuid, caller_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM galleries WHERE id = ?1 AND photographer_id = ?2")
            .bind(id)
            .bind(caller_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(GALLERY_NOT_FOUND.to_string()));
        }

        tracing::info!(gallery_id = %id, photographer_id = %caller_id, "Gallery deleted");

        Ok(())
    }

    /// Image, access and download counts for one of the caller's galleries
    pub async fn get_stats(&self, id: Uuid, caller_id: Uuid) -> Result<GalleryStats> {
        find_owned_gallery(&self.db, id, caller_id).await?;

        let (image_count, access_count, download_count): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM images WHERE gallery_id = ?1),
                (SELECT COUNT(*) FROM gallery_access WHERE gallery_id = ?1),
                (SELECT COUNT(*) FROM image_download WHERE gallery_id = ?1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(GalleryStats {
            image_count,
            access_count,
            download_count,
        })
    }
}
