//! Shared Data Transfer Objects (DTOs) and extractors for API handlers.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use serde::Serialize;

use crate::error::AppError;

/// `Json` extractor whose rejections render as `VALIDATION_ERROR` bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Query` extractor whose rejections render as `VALIDATION_ERROR` bodies.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `Path` extractor; an unparseable id renders as a `NOT_FOUND` body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Body returned by operations that have nothing else to report.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
