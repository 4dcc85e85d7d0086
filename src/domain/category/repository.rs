//! Category repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Category, CategoryId};
use crate::domain::movie::EidrCode;
use crate::domain::DomainError;

/// Read access to categories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync + Debug {
    /// All categories ordered by id
    async fn list(&self) -> Result<Vec<Category>, DomainError>;

    /// Categories with the given ids ordered by id; unknown ids are skipped
    async fn get_many(&self, ids: &[CategoryId]) -> Result<Vec<Category>, DomainError>;

    /// Categories linked to a movie ordered by id
    async fn for_movie(&self, eidr_code: &EidrCode) -> Result<Vec<Category>, DomainError>;
}
