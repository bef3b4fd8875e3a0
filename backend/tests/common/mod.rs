//! Common test utilities for API integration tests
//!
//! - In-memory application setup with the full router
//! - Photographer seeding and session tokens
//! - Request helpers returning status and JSON body

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

use galleria_backend::api::{routes::create_router, AppState};
use galleria_backend::config::Config;
use galleria_backend::db;
use galleria_backend::services::auth_service::AuthService;

pub const TEST_SECRET: &str = "integration-test-secret-integration-test";

/// A seeded photographer and a valid session token for them
pub struct TestPhotographer {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub token: String,
}

/// Test context: the full router over a fresh in-memory database
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub auth: Arc<AuthService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "AUTH_SECRET" => Some(TEST_SECRET.to_string()),
            "BCRYPT_COST" => Some("4".to_string()),
            _ => None,
        })
        .expect("test config");

        let pool = db::create_pool(&config.database_url, 1)
            .await
            .expect("Failed to open test database");
        db::run_migrations(&pool).await.expect("migrations");

        let state = Arc::new(AppState::new(config, pool.clone()));
        let auth = state.auth_service.clone();

        Self {
            router: create_router(state),
            pool,
            auth,
        }
    }

    /// Insert a photographer row and mint a session token for it
    pub async fn photographer(&self, name: &str) -> TestPhotographer {
        let id = Uuid::new_v4();
        let email = format!("{}@galleria.test", name.to_lowercase());
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, name, email, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
        )
        .bind(id)
        .bind(name)
        .bind(&email)
        .bind(now)
        .execute(&self.pool)
        .await
        .expect("insert photographer");

        let token = self
            .auth
            .issue_access_token(id, &email, name, Duration::hours(1))
            .expect("issue token");

        TestPhotographer {
            id,
            email,
            name: name.to_string(),
            token,
        }
    }

    /// Send a request through the router and decode the JSON body (Null when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Create a gallery over the API and return its id
    pub async fn create_gallery(&self, owner: &TestPhotographer, body: Value) -> Uuid {
        let (status, json) = self.post("/api/v1/galleries", Some(&owner.token), body).await;
        assert_eq!(status, StatusCode::CREATED, "create gallery failed: {}", json);
        json["id"].as_str().unwrap().parse().unwrap()
    }

    /// Create and publish a gallery, returning its id
    pub async fn publish_gallery(&self, owner: &TestPhotographer, body: Value) -> Uuid {
        let id = self.create_gallery(owner, body).await;
        let (status, _) = self
            .put(
                &format!("/api/v1/galleries/{}/status", id),
                &owner.token,
                serde_json::json!({ "status": "active" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    /// Register an image over the API and return its id
    pub async fn add_image(&self, owner: &TestPhotographer, gallery_id: Uuid, body: Value) -> Uuid {
        let (status, json) = self
            .post(
                &format!("/api/v1/galleries/{}/images", gallery_id),
                Some(&owner.token),
                body,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add image failed: {}", json);
        json["id"].as_str().unwrap().parse().unwrap()
    }
}
