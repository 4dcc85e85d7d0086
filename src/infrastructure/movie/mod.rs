//! Movie infrastructure implementations

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresMovieRepository;
pub use repository::InMemoryMovieRepository;
pub use service::{MovieDetails, MovieService, MovieTablePage, SaveMovieRequest};
