//! Bookshelf Server
//!
//! A REST JSON API over an in-memory, thread-safe book catalog.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Build the single store instance and the services around it
    pub fn new(config: AppConfig) -> Self {
        let repository = Repository::new();
        if config.store.seed_sample_data {
            repository.books.seed(models::book::sample_books());
            tracing::info!("Loaded {} sample books", repository.books.count());
        }

        Self {
            config: Arc::new(config),
            services: Arc::new(Services::new(repository)),
        }
    }
}
