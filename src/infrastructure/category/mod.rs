//! Category infrastructure implementations

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresCategoryRepository;
pub use repository::InMemoryCategoryRepository;
