//! Movie repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{EidrCode, Movie};
use super::query::{MoviePage, MovieQuery};
use crate::domain::category::CategoryId;
use crate::domain::DomainError;

/// Repository trait for movie storage
///
/// Write operations are atomic: a movie and its category links are stored,
/// replaced or removed together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync + Debug {
    /// Get a movie by its EIDR code
    async fn get(&self, eidr_code: &EidrCode) -> Result<Option<Movie>, DomainError>;

    /// Movies whose name equals `name`, ignoring case, ordered by EIDR code
    async fn find_by_name(&self, name: &str) -> Result<Vec<Movie>, DomainError>;

    /// Store a new movie linked to the given categories
    async fn create(
        &self,
        movie: Movie,
        category_ids: Vec<CategoryId>,
    ) -> Result<Movie, DomainError>;

    /// Update a movie; when `category_ids` is set its links are replaced
    async fn update(
        &self,
        movie: &Movie,
        category_ids: Option<Vec<CategoryId>>,
    ) -> Result<Movie, DomainError>;

    /// Delete all given movies or none of them
    async fn delete_many(&self, eidr_codes: Vec<EidrCode>) -> Result<u64, DomainError>;

    /// Filtered, ordered and paginated movie table
    async fn search(&self, query: &MovieQuery) -> Result<MoviePage, DomainError>;

    /// Check if a movie exists
    async fn exists(&self, eidr_code: &EidrCode) -> Result<bool, DomainError> {
        Ok(self.get(eidr_code).await?.is_some())
    }
}
