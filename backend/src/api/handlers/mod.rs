//! HTTP request handlers.

pub mod galleries;
pub mod health;
pub mod images;
pub mod profile;
pub mod share;
