//! PostgreSQL connection pooling and error translation

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};

use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/movie_descriptions".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }
}

/// Open a connection pool
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// Begin a SERIALIZABLE transaction
pub async fn begin_serializable(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, DomainError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to set isolation level: {}", e)))?;

    Ok(tx)
}

/// Commit a transaction
pub async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| storage_error("commit transaction", e))
}

/// Translate a sqlx error raised while writing
///
/// Unique violations become conflicts; foreign-key violations mean a
/// referenced category vanished.
pub fn write_error(action: &str, conflict_message: &str, err: sqlx::Error) -> DomainError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return DomainError::conflict(conflict_message);
        }

        if db_err.is_foreign_key_violation() {
            return DomainError::validation("Some categories do not exist.");
        }
    }

    storage_error(action, err)
}

/// Wrap a sqlx error as a storage error
pub fn storage_error(action: &str, err: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to {}: {}", action, err))
}
