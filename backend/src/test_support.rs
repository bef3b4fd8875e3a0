//! Fixtures for unit tests that need a migrated database.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;

pub async fn memory_pool() -> SqlitePool {
    let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

pub async fn insert_photographer(pool: &SqlitePool, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO users (id, name, email, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(id)
    .bind(name)
    .bind(format!("{}-{}@example.com", name.to_lowercase(), id.simple()))
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub async fn insert_image(
    pool: &SqlitePool,
    gallery_id: Uuid,
    filename: &str,
    sort_order: i32,
) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO images (id, filename, original_name, mime_type, size, storage_path,
                            sort_order, created_at, updated_at, gallery_id)
        VALUES (?1, ?2, ?2, 'image/jpeg', 1024, ?3, ?4, ?5, ?5, ?6)
        "#,
    )
    .bind(id)
    .bind(filename)
    .bind(format!("galleries/{}/{}", gallery_id, filename))
    .bind(sort_order)
    .bind(now)
    .bind(gallery_id)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub async fn insert_access(pool: &SqlitePool, gallery_id: Uuid) {
    sqlx::query("INSERT INTO gallery_access (id, accessed_at, gallery_id) VALUES (?1, ?2, ?3)")
        .bind(Uuid::new_v4())
        .bind(Utc::now())
        .bind(gallery_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_download(pool: &SqlitePool, gallery_id: Uuid, image_id: Uuid) {
    sqlx::query(
        "INSERT INTO image_download (id, downloaded_at, image_id, gallery_id) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(Uuid::new_v4())
    .bind(Utc::now())
    .bind(image_id)
    .bind(gallery_id)
    .execute(pool)
    .await
    .unwrap();
}
