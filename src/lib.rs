//! Movie Descriptions API
//!
//! A catalogue of movies identified by their EIDR code, each belonging to
//! one or more categories. Exposes:
//! - Category listing and a filtered, sorted, paginated movie table
//! - Movie lookup, creation, update and bulk deletion
//! - PostgreSQL or in-memory storage selected by configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::movie::MovieService;
use infrastructure::storage::{
    InMemoryCatalog, Repositories, StorageConfig, StorageFactory, StorageType,
};
use tracing::info;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = storage_config(config)?;
    info!("Storage backend: {:?}", storage_config.storage_type());

    let repositories = StorageFactory::create(&storage_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    Ok(app_state(repositories))
}

/// Application state over a fresh in-memory catalogue seeded with the default categories
pub fn create_in_memory_app_state() -> AppState {
    app_state(StorageFactory::create_in_memory(InMemoryCatalog::seeded()))
}

fn app_state(repositories: Repositories) -> AppState {
    let movie_service = MovieService::new(repositories.movies, repositories.categories);

    AppState::new(Arc::new(movie_service))
}

fn storage_config(config: &AppConfig) -> anyhow::Result<StorageConfig> {
    let storage_type = StorageType::from_str(&config.storage.backend).ok_or_else(|| {
        anyhow::anyhow!("Unknown storage backend '{}'", config.storage.backend)
    })?;

    match storage_type {
        StorageType::InMemory => Ok(StorageConfig::in_memory()),
        StorageType::Postgres => {
            if config.database.url.trim().is_empty() {
                anyhow::bail!("database.url or DATABASE_URL is required for PostgreSQL storage");
            }

            Ok(StorageConfig::postgres(
                config.database.pool_config(),
                config.database.run_migrations,
            ))
        }
    }
}
