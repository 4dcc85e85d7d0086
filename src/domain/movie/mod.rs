//! Movie domain module
//!
//! Movies are identified by their EIDR code and belong to one or more
//! categories.

mod entity;
mod query;
mod repository;
mod validation;

pub use entity::{EidrCode, Movie, MovieStatus};
pub use query::{
    join_category_names, total_pages, MovieOrderBy, MoviePage, MovieQuery, MovieTableRow,
    SortDirection, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use repository::MovieRepository;
pub use validation::{
    validate_eidr_code, validate_movie_name, validate_rating, validate_year,
    MovieValidationError, MAX_EIDR_CODE_LENGTH, MAX_MOVIE_NAME_LENGTH,
};

#[cfg(test)]
pub use repository::MockMovieRepository;
