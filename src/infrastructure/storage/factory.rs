//! Runtime selection of the storage backend

use std::sync::Arc;

use tracing::info;

use crate::domain::{CategoryRepository, DomainError, MovieRepository};
use crate::infrastructure::category::PostgresCategoryRepository;
use crate::infrastructure::movie::PostgresMovieRepository;

use super::in_memory::InMemoryCatalog;
use super::migrations::run_storage_migrations;
use super::postgres::{connect_pool, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage seeded with the default categories
    InMemory,
    /// PostgreSQL storage
    Postgres {
        config: PostgresConfig,
        run_migrations: bool,
    },
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig, run_migrations: bool) -> Self {
        Self::Postgres {
            config,
            run_migrations,
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres { .. } => StorageType::Postgres,
        }
    }
}

/// Repositories backing the catalogue
#[derive(Debug, Clone)]
pub struct Repositories {
    pub movies: Arc<dyn MovieRepository>,
    pub categories: Arc<dyn CategoryRepository>,
}

/// Factory for creating repository instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the repositories described by the configuration
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Self::create_in_memory(InMemoryCatalog::seeded())),
            StorageConfig::Postgres {
                config,
                run_migrations,
            } => {
                info!("Connecting to PostgreSQL...");
                let pool = connect_pool(config).await?;
                info!("PostgreSQL connection established");

                if *run_migrations {
                    run_storage_migrations(&pool).await?;
                    info!("Database migrations applied");
                }

                Ok(Repositories {
                    movies: Arc::new(PostgresMovieRepository::new(pool.clone())),
                    categories: Arc::new(PostgresCategoryRepository::new(pool)),
                })
            }
        }
    }

    /// Creates repositories sharing one in-memory catalogue
    pub fn create_in_memory(catalog: InMemoryCatalog) -> Repositories {
        Repositories {
            movies: Arc::new(catalog.movie_repository()),
            categories: Arc::new(catalog.category_repository()),
        }
    }
}
