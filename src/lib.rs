//! Biblio Library Management Backend
//!
//! A Rust REST backend for a small library, providing a JSON API for
//! managing authors, books, users and book borrows, with opaque
//! bearer-token authentication.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
