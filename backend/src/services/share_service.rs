//! Client-facing access to published galleries.
//!
//! Only `active` galleries are visible here. Every successful view and
//! download appends a row to the matching log table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::access_log::{ClientIdentity, RequesterInfo};
use crate::models::gallery::{Gallery, GalleryStatus, StorageProvider, GALLERY_COLUMNS};
use crate::models::image::{Image, IMAGE_COLUMNS};
use crate::services::auth_service::AuthService;
use crate::services::validation;

/// Credentials and optional identity a client sends when opening a share link
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub password: Option<String>,
    #[serde(flatten)]
    pub client: ClientIdentity,
}

/// What a client sees of a gallery. Omits the password hash, storage
/// configuration and owner details.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGallery {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub client_name: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_location: Option<String>,
    pub allow_downloads: bool,
    pub allow_comments: bool,
    pub cover_image_id: Option<Uuid>,
    pub theme: Option<Json<serde_json::Value>>,
    pub watermark_config: Option<Json<serde_json::Value>>,
    pub meta_description: Option<String>,
    pub tags: Option<Json<Vec<String>>>,
    pub published_at: Option<DateTime<Utc>>,
    pub images: Vec<Image>,
}

impl PublicGallery {
    fn from_parts(gallery: Gallery, images: Vec<Image>) -> Self {
        Self {
            id: gallery.id,
            title: gallery.title,
            description: gallery.description,
            slug: gallery.slug,
            client_name: gallery.client_name,
            event_date: gallery.event_date,
            event_location: gallery.event_location,
            allow_downloads: gallery.allow_downloads,
            allow_comments: gallery.allow_comments,
            cover_image_id: gallery.cover_image_id,
            theme: gallery.theme,
            watermark_config: gallery.watermark_config,
            meta_description: gallery.meta_description,
            tags: gallery.tags,
            published_at: gallery.published_at,
            images,
        }
    }
}

/// Where to fetch an image's original file from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDescriptor {
    pub image_id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub storage_provider: StorageProvider,
    pub storage_path: String,
}

/// Share service
pub struct ShareService {
    db: SqlitePool,
}

impl ShareService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Load an active gallery and check the share password.
    async fn open(&self, gallery_id: Uuid, request: &ShareRequest) -> Result<Gallery> {
        if let Some(email) = &request.client.client_email {
            validation::validate_email("clientEmail", email)?;
        }

        let sql = format!(
            "SELECT {} FROM galleries WHERE id = ?1 AND status = ?2",
            GALLERY_COLUMNS
        );
        let gallery = sqlx::query_as::<_, Gallery>(&sql)
            .bind(gallery_id)
            .bind(GalleryStatus::Active)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Gallery not found".to_string()))?;

        if gallery.is_password_protected {
            let (password, hash) = match (request.password.clone(), gallery.password_hash.clone()) {
                (Some(password), Some(hash)) => (password, hash),
                _ => {
                    return Err(AppError::Authentication(
                        "Gallery password required".to_string(),
                    ))
                }
            };
            let valid =
                tokio::task::spawn_blocking(move || AuthService::verify_password(&password, &hash))
                    .await
                    .map_err(|e| {
                        AppError::Internal(format!("Password verification task failed: {}", e))
                    })??;
            if !valid {
                tracing::debug!(gallery_id = %gallery_id, "Rejected share password");
                return Err(AppError::Authentication(
                    "Invalid gallery password".to_string(),
                ));
            }
        }

        Ok(gallery)
    }

    /// Open a shared gallery and record the visit
    pub async fn view(
        &self,
        gallery_id: Uuid,
        request: ShareRequest,
        requester: RequesterInfo,
    ) -> Result<PublicGallery> {
        let gallery = self.open(gallery_id, &request).await?;

        let sql = format!(
            "SELECT {} FROM images WHERE gallery_id = ?1 AND is_hidden = 0 ORDER BY sort_order, created_at",
            IMAGE_COLUMNS
        );
        let images = sqlx::query_as::<_, Image>(&sql)
            .bind(gallery_id)
            .fetch_all(&self.db)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO gallery_access (id, ip_address, user_agent, accessed_at, client_name, client_email, gallery_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&requester.ip_address)
        .bind(&requester.user_agent)
        .bind(Utc::now())
        .bind(&request.client.client_name)
        .bind(&request.client.client_email)
        .bind(gallery_id)
        .execute(&self.db)
        .await?;

        tracing::info!(
            gallery_id = %gallery_id,
            ip = requester.ip_address.as_deref().unwrap_or("-"),
            images = images.len(),
            "Shared gallery viewed"
        );

        Ok(PublicGallery::from_parts(gallery, images))
    }

    /// Authorize an image download and record it
    pub async fn download(
        &self,
        gallery_id: Uuid,
        image_id: Uuid,
        request: ShareRequest,
        requester: RequesterInfo,
    ) -> Result<DownloadDescriptor> {
        let gallery = self.open(gallery_id, &request).await?;

        if !gallery.allow_downloads {
            return Err(AppError::Authorization(
                "Downloads are disabled for this gallery".to_string(),
            ));
        }

        let sql = format!(
            "SELECT {} FROM images WHERE id = ?1 AND gallery_id = ?2 AND is_hidden = 0",
            IMAGE_COLUMNS
        );
        let image = sqlx::query_as::<_, Image>(&sql)
            .bind(image_id)
            .bind(gallery_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO image_download (id, ip_address, user_agent, downloaded_at, client_name, client_email, image_id, gallery_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&requester.ip_address)
        .bind(&requester.user_agent)
        .bind(Utc::now())
        .bind(&request.client.client_name)
        .bind(&request.client.client_email)
        .bind(image_id)
        .bind(gallery_id)
        .execute(&self.db)
        .await?;

        tracing::info!(gallery_id = %gallery_id, image_id = %image_id, "Image downloaded");

        Ok(DownloadDescriptor {
            image_id: image.id,
            filename: image.filename,
            original_name: image.original_name,
            mime_type: image.mime_type,
            size: image.size,
            storage_provider: gallery.storage_provider,
            storage_path: image.storage_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::access_log::{GalleryAccess, ImageDownload};
    use crate::services::gallery_service::{
        CreateGalleryInput, GalleryService, UpdateGalleryInput,
    };
    use crate::services::image_service::{ImageService, UpdateImageInput};
    use crate::test_support;

    struct Fixture {
        share: ShareService,
        galleries: GalleryService,
        images: ImageService,
        pool: SqlitePool,
        owner: Uuid,
    }

    async fn setup() -> Fixture {
        let pool = test_support::memory_pool().await;
        let owner = test_support::insert_photographer(&pool, "Anna").await;
        Fixture {
            share: ShareService::new(pool.clone()),
            galleries: GalleryService::new(pool.clone(), 4),
            images: ImageService::new(pool.clone()),
            pool,
            owner,
        }
    }

    async fn published(fx: &Fixture, input: CreateGalleryInput) -> Uuid {
        let gallery = fx.galleries.create(fx.owner, input).await.unwrap();
        fx.galleries
            .update_status(gallery.id, fx.owner, GalleryStatus::Active)
            .await
            .unwrap();
        gallery.id
    }

    fn requester() -> RequesterInfo {
        RequesterInfo {
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        }
    }

    #[tokio::test]
    async fn test_view_active_gallery_logs_access() {
        let fx = setup().await;
        let id = published(&fx, CreateGalleryInput::new("Wedding", "wedding")).await;
        test_support::insert_image(&fx.pool, id, "b.jpg", 1).await;
        let hidden = test_support::insert_image(&fx.pool, id, "hidden.jpg", 0).await;
        fx.images
            .update(
                id,
                hidden,
                fx.owner,
                UpdateImageInput {
                    is_hidden: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let request = ShareRequest {
            password: None,
            client: ClientIdentity {
                client_name: Some("Sarah".to_string()),
                client_email: Some("sarah@example.com".to_string()),
            },
        };
        let view = fx.share.view(id, request, requester()).await.unwrap();

        assert_eq!(view.id, id);
        assert_eq!(view.images.len(), 1);
        assert!(view.images.iter().all(|i| !i.is_hidden));

        let logs = sqlx::query_as::<_, GalleryAccess>(
            "SELECT id, ip_address, user_agent, accessed_at, client_name, client_email, gallery_id FROM gallery_access",
        )
        .fetch_all(&fx.pool)
        .await
        .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].gallery_id, id);
        assert_eq!(logs[0].ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(logs[0].client_email.as_deref(), Some("sarah@example.com"));
    }

    #[tokio::test]
    async fn test_view_hides_unpublished_galleries() {
        let fx = setup().await;
        let draft = fx
            .galleries
            .create(fx.owner, CreateGalleryInput::new("Draft", "draft"))
            .await
            .unwrap();

        let err = fx
            .share
            .view(draft.id, ShareRequest::default(), RequesterInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        for status in [GalleryStatus::Private, GalleryStatus::Archived] {
            fx.galleries
                .update_status(draft.id, fx.owner, status)
                .await
                .unwrap();
            let err = fx
                .share
                .view(draft.id, ShareRequest::default(), RequesterInfo::default())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gallery_access")
            .fetch_one(&fx.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_view_checks_password() {
        let fx = setup().await;
        let mut input = CreateGalleryInput::new("Private", "private");
        input.is_password_protected = true;
        input.password = Some("open-sesame".to_string());
        let id = published(&fx, input).await;

        let err = fx
            .share
            .view(id, ShareRequest::default(), RequesterInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));

        let wrong = ShareRequest {
            password: Some("guess".to_string()),
            ..Default::default()
        };
        let err = fx
            .share
            .view(id, wrong, RequesterInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));

        let right = ShareRequest {
            password: Some("open-sesame".to_string()),
            ..Default::default()
        };
        let view = fx
            .share
            .view(id, right, RequesterInfo::default())
            .await
            .unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("storageConfig").is_none());
    }

    #[tokio::test]
    async fn test_protected_without_stored_hash_rejects() {
        let fx = setup().await;
        let mut input = CreateGalleryInput::new("Locked", "locked");
        input.is_password_protected = true;
        let id = published(&fx, input).await;

        let request = ShareRequest {
            password: Some("anything".to_string()),
            ..Default::default()
        };
        let err = fx
            .share
            .view(id, request, RequesterInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_download_logs_and_returns_descriptor() {
        let fx = setup().await;
        let id = published(&fx, CreateGalleryInput::new("Wedding", "wedding")).await;
        let image = test_support::insert_image(&fx.pool, id, "a.jpg", 0).await;

        let descriptor = fx
            .share
            .download(id, image, ShareRequest::default(), requester())
            .await
            .unwrap();
        assert_eq!(descriptor.image_id, image);
        assert_eq!(descriptor.storage_provider, StorageProvider::Local);
        assert_eq!(descriptor.storage_path, format!("galleries/{}/a.jpg", id));

        let logs = sqlx::query_as::<_, ImageDownload>(
            "SELECT id, ip_address, user_agent, downloaded_at, client_name, client_email, image_id, gallery_id FROM image_download",
        )
        .fetch_all(&fx.pool)
        .await
        .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].image_id, image);
        assert_eq!(logs[0].user_agent.as_deref(), Some("Mozilla/5.0"));

        let stats = fx.galleries.get_stats(id, fx.owner).await.unwrap();
        assert_eq!(stats.download_count, 1);
    }

    #[tokio::test]
    async fn test_download_respects_flags() {
        let fx = setup().await;
        let id = published(&fx, CreateGalleryInput::new("Wedding", "wedding")).await;
        let image = test_support::insert_image(&fx.pool, id, "a.jpg", 0).await;

        let err = fx
            .share
            .download(id, Uuid::new_v4(), ShareRequest::default(), requester())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        fx.galleries
            .update(
                id,
                fx.owner,
                UpdateGalleryInput {
                    allow_downloads: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = fx
            .share
            .download(id, image, ShareRequest::default(), requester())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM image_download")
            .fetch_one(&fx.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
