//! Domain models.

pub mod access_log;
pub mod gallery;
pub mod image;
pub mod user;
