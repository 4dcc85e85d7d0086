//! PostgreSQL category repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{Category, CategoryId, CategoryRepository, DomainError, EidrCode};
use crate::infrastructure::storage::storage_error;

/// PostgreSQL implementation of CategoryRepository
#[derive(Debug, Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("list categories", e))?;

        rows.iter().map(row_to_category).collect()
    }

    async fn get_many(&self, ids: &[CategoryId]) -> Result<Vec<Category>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query("SELECT id, name FROM categories WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("get categories", e))?;

        rows.iter().map(row_to_category).collect()
    }

    async fn for_movie(&self, eidr_code: &EidrCode) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN movie_category mc ON mc.category_id = c.id
            WHERE mc.movie_eidr = $1
            ORDER BY c.id
            "#,
        )
        .bind(eidr_code.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("get movie categories", e))?;

        rows.iter().map(row_to_category).collect()
    }
}

fn row_to_category(row: &PgRow) -> Result<Category, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| storage_error("read category id", e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| storage_error("read category name", e))?;

    Ok(Category::new(id, name))
}
