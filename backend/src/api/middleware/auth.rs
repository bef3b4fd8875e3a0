//! Authentication middleware.
//!
//! Requires `Authorization: Bearer <jwt>` on every route it wraps. The token
//! is issued by the external auth provider; this layer only verifies it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth_service::{AuthService, Claims};

/// Extension that holds the authenticated photographer
#[derive(Debug, Clone)]
pub struct AuthExtension {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<Claims> for AuthExtension {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

fn extract_bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware function - requires a valid session token
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(&request) else {
        return AppError::Authentication("Missing bearer token".to_string()).into_response();
    };

    match auth_service.validate_access_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthExtension::from(claims));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
