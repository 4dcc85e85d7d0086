//! Versioned schema migrations for the catalogue database

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::info;

use super::postgres::storage_error;
use crate::domain::{DomainError, DEFAULT_CATEGORY_NAMES};

/// Advisory lock key held while migrations run; arbitrary but fixed
const MIGRATION_LOCK_KEY: i64 = 0x6d6f_7669_6573;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self) -> Result<(), DomainError>;

    /// Reverts the last migration
    async fn revert(&self) -> Result<(), DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn verb(self) -> &'static str {
        match self {
            Self::Up => "apply",
            Self::Down => "revert",
        }
    }
}

/// PostgreSQL migrator over the catalogue migrations
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            migrations: storage_migrations(),
        }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("create migrations table", e))?;

        Ok(())
    }

    /// Applies or reverts one migration together with its bookkeeping row
    ///
    /// Runs under a transaction-scoped advisory lock so two instances
    /// starting at once cannot apply the same version twice.
    async fn step(&self, migration: &Migration, direction: Direction) -> Result<bool, DomainError> {
        let verb = direction.verb();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin migration transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("acquire migration lock", e))?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| storage_error("check migration status", e))?;

        if applied == (direction == Direction::Up) {
            return Ok(false);
        }

        let sql = match direction {
            Direction::Up => &migration.up,
            Direction::Down => &migration.down,
        };

        sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(sql))
            .await
            .map_err(|e| storage_error(&format!("{} migration {}", verb, migration.version), e))?;

        let recorded = match direction {
            Direction::Up => {
                sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
                    .bind(migration.version)
                    .bind(&migration.description)
                    .execute(&mut *tx)
                    .await
            }
            Direction::Down => {
                sqlx::query("DELETE FROM _migrations WHERE version = $1")
                    .bind(migration.version)
                    .execute(&mut *tx)
                    .await
            }
        };
        recorded.map_err(|e| storage_error(&format!("record migration {}", migration.version), e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("commit migration", e))?;

        info!(
            version = migration.version,
            description = %migration.description,
            "Migration {}: {}",
            migration.version,
            match direction {
                Direction::Up => "applied",
                Direction::Down => "reverted",
            }
        );

        Ok(true)
    }

    /// Latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("read migration version", e))
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        let mut applied = 0;
        for migration in &self.migrations {
            if self.step(migration, Direction::Up).await? {
                applied += 1;
            }
        }

        if applied == 0 {
            info!("Database schema is up to date");
        }

        Ok(())
    }

    async fn revert(&self) -> Result<(), DomainError> {
        let Some(version) = self.current_version().await? else {
            info!("No migrations to revert");
            return Ok(());
        };

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::storage(format!(
                    "Applied migration {} is unknown to this build",
                    version
                ))
            })?;

        self.step(migration, Direction::Down).await?;

        Ok(())
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.current_version().await
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// INSERT statement seeding the default categories
fn seed_categories_sql() -> String {
    let values = DEFAULT_CATEGORY_NAMES
        .iter()
        .zip(1..)
        .map(|(name, id)| format!("({}, '{}')", id, name.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",\n                ");

    format!(
        r#"
            INSERT INTO categories (id, name) VALUES
                {}
            ON CONFLICT DO NOTHING;
            SELECT setval(pg_get_serial_sequence('categories', 'id'), (SELECT MAX(id) FROM categories));
            "#,
        values
    )
}

/// Collection of migrations for the catalogue schema
pub fn storage_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create categories table",
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE
            );
            "#,
            r#"
            DROP TABLE IF EXISTS categories;
            "#,
        ),
        Migration::new(
            2,
            "Create movies table",
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                eidr_code VARCHAR(255) PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                rating DOUBLE PRECISION NOT NULL,
                year INTEGER NOT NULL,
                status VARCHAR(16) NOT NULL CHECK (status IN ('ACTIVE', 'INACTIVE'))
            );
            CREATE INDEX IF NOT EXISTS idx_movies_name ON movies(name);
            CREATE INDEX IF NOT EXISTS idx_movies_rating ON movies(rating);
            "#,
            r#"
            DROP TABLE IF EXISTS movies;
            "#,
        ),
        Migration::new(
            3,
            "Create movie_category table",
            r#"
            CREATE TABLE IF NOT EXISTS movie_category (
                movie_eidr VARCHAR(255) NOT NULL REFERENCES movies(eidr_code) ON DELETE CASCADE,
                category_id BIGINT NOT NULL REFERENCES categories(id),
                PRIMARY KEY (movie_eidr, category_id)
            );
            CREATE INDEX IF NOT EXISTS idx_movie_category_category_id
                ON movie_category(category_id);
            "#,
            r#"
            DROP TABLE IF EXISTS movie_category;
            "#,
        ),
        Migration::new(
            4,
            "Seed default categories",
            seed_categories_sql(),
            format!(
                "DELETE FROM categories WHERE id BETWEEN 1 AND {};",
                DEFAULT_CATEGORY_NAMES.len()
            ),
        ),
    ]
}

/// Runs all pending storage migrations
pub async fn run_storage_migrations(pool: &PgPool) -> Result<(), DomainError> {
    PostgresMigrator::new(pool.clone()).run().await
}
