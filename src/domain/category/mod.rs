//! Category domain module
//!
//! Categories group movies. They are seeded by migration and are read-only
//! through the API.

mod entity;
mod repository;

pub use entity::{Category, CategoryId, DEFAULT_CATEGORY_NAMES};
pub use repository::CategoryRepository;

#[cfg(test)]
pub use repository::MockCategoryRepository;
