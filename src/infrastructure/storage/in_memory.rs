//! In-memory catalogue shared by the in-memory repositories

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Category, CategoryId, EidrCode, Movie, DEFAULT_CATEGORY_NAMES};
use crate::infrastructure::category::InMemoryCategoryRepository;
use crate::infrastructure::movie::InMemoryMovieRepository;

/// Tables of the in-memory catalogue
#[derive(Debug, Default)]
pub struct CatalogData {
    pub categories: BTreeMap<CategoryId, Category>,
    pub movies: BTreeMap<EidrCode, Movie>,
    /// Category links per movie
    pub links: BTreeMap<EidrCode, BTreeSet<CategoryId>>,
}

impl CatalogData {
    /// Categories linked to a movie, ordered by id
    pub fn categories_of(&self, eidr_code: &EidrCode) -> Vec<Category> {
        self.links
            .get(eidr_code)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.categories.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Thread-safe in-memory catalogue
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    data: Arc<RwLock<CatalogData>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalogue holding the default categories
    pub fn seeded() -> Self {
        let categories = DEFAULT_CATEGORY_NAMES
            .iter()
            .zip(1..)
            .map(|(name, id)| Category::new(id, *name))
            .collect();

        Self::with_categories(categories)
    }

    /// Creates a catalogue pre-populated with categories
    pub fn with_categories(categories: Vec<Category>) -> Self {
        let data = CatalogData {
            categories: categories.into_iter().map(|c| (c.id(), c)).collect(),
            ..Default::default()
        };

        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    pub(crate) fn data(&self) -> &Arc<RwLock<CatalogData>> {
        &self.data
    }

    pub fn movie_repository(&self) -> InMemoryMovieRepository {
        InMemoryMovieRepository::new(self.clone())
    }

    pub fn category_repository(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository::new(self.clone())
    }
}
