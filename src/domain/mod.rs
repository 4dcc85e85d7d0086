//! Domain layer - Core business logic and entities

pub mod category;
pub mod error;
pub mod movie;

pub use category::{Category, CategoryId, CategoryRepository, DEFAULT_CATEGORY_NAMES};
pub use error::DomainError;
pub use movie::{
    join_category_names, EidrCode, Movie, MovieOrderBy, MoviePage, MovieQuery, MovieRepository,
    MovieStatus, MovieTableRow, MovieValidationError, SortDirection,
};
