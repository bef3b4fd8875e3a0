//! Galleria - Backend Library
//!
//! Photographer-owned galleries, shared with clients through a public link.

#[macro_use]
mod macros;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{AppError, Result};
