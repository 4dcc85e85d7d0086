//! In-memory category repository implementation

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, CategoryRepository, DomainError, EidrCode};
use crate::infrastructure::storage::InMemoryCatalog;

/// In-memory implementation of CategoryRepository
#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    catalog: InMemoryCatalog,
}

impl InMemoryCategoryRepository {
    pub fn new(catalog: InMemoryCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let data = self.catalog.data().read().await;
        Ok(data.categories.values().cloned().collect())
    }

    async fn get_many(&self, ids: &[CategoryId]) -> Result<Vec<Category>, DomainError> {
        let data = self.catalog.data().read().await;

        Ok(data
            .categories
            .values()
            .filter(|c| ids.contains(&c.id()))
            .cloned()
            .collect())
    }

    async fn for_movie(&self, eidr_code: &EidrCode) -> Result<Vec<Category>, DomainError> {
        let data = self.catalog.data().read().await;
        Ok(data.categories_of(eidr_code))
    }
}
