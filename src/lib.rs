//! Data Buku
//!
//! Book catalog client for a `data_buku` REST collection: field validation,
//! the HTTP store client, and the list/create/edit controllers behind the
//! catalog page. Ships with an in-memory development backend serving the
//! same resource.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod console;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod store;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Development backend state shared across all handlers
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<AppConfig>,
    pub repository: repository::Repository,
}

impl ServerState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        Self {
            config: Arc::new(config),
            repository,
        }
    }
}
