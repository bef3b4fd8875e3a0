//! Business logic services.

pub mod auth_service;
pub mod gallery_service;
pub mod image_service;
pub mod photographer_service;
pub mod share_service;
pub mod validation;
