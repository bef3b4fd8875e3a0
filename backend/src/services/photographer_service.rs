//! Photographer accounts.
//!
//! The auth provider is the source of truth for accounts, but it does not
//! always share this database. A verified session is enough to own
//! galleries, so the account row is created on first use.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::api::middleware::auth::AuthExtension;
use crate::error::{AppError, Result};
use crate::models::user::Photographer;

const PHOTOGRAPHER_COLUMNS: &str = "id, name, email, created_at, updated_at";

pub struct PhotographerService {
    db: SqlitePool,
}

impl PhotographerService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Look up the stored account row.
    pub async fn find(&self, id: Uuid) -> Result<Option<Photographer>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", PHOTOGRAPHER_COLUMNS);
        let photographer = sqlx::query_as::<_, Photographer>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(photographer)
    }

    /// Make sure the session's photographer has an account row, inserting
    /// one from the token claims when missing. Existing rows are left as-is.
    pub async fn ensure_exists(&self, session: &AuthExtension) -> Result<Photographer> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(session.user_id)
        .bind(&session.name)
        .bind(&session.email)
        .bind(now)
        .execute(&self.db)
        .await?;

        // Nothing was inserted and no row carries this id: the email belongs
        // to a different account.
        self.find(session.user_id).await?.ok_or_else(|| {
            tracing::warn!(
                user_id = %session.user_id,
                "Session email is registered to another photographer"
            );
            AppError::Conflict("Email is already registered to another account".to_string())
        })
    }
}
