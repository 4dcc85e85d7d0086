//! Movie validation

use thiserror::Error;

/// Errors that can occur during movie validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MovieValidationError {
    #[error("EIDR code cannot be empty")]
    EmptyEidrCode,

    #[error("EIDR code cannot exceed {0} characters")]
    EidrCodeTooLong(usize),

    #[error("Movie name cannot be empty")]
    EmptyName,

    #[error("Movie name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Rating must be a finite number")]
    InvalidRating,

    #[error("Year cannot be in the future.")]
    YearInFuture { year: i32, current: i32 },

    #[error("Movie has to have at least one category.")]
    NoCategories,

    #[error("Unknown movie status '{0}'")]
    UnknownStatus(String),
}

pub const MAX_EIDR_CODE_LENGTH: usize = 255;
pub const MAX_MOVIE_NAME_LENGTH: usize = 255;

/// Validate an EIDR code
pub fn validate_eidr_code(code: &str) -> Result<(), MovieValidationError> {
    if code.trim().is_empty() {
        return Err(MovieValidationError::EmptyEidrCode);
    }

    if code.chars().count() > MAX_EIDR_CODE_LENGTH {
        return Err(MovieValidationError::EidrCodeTooLong(MAX_EIDR_CODE_LENGTH));
    }

    Ok(())
}

/// Validate a movie name
pub fn validate_movie_name(name: &str) -> Result<(), MovieValidationError> {
    if name.trim().is_empty() {
        return Err(MovieValidationError::EmptyName);
    }

    if name.chars().count() > MAX_MOVIE_NAME_LENGTH {
        return Err(MovieValidationError::NameTooLong(MAX_MOVIE_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a rating value
pub fn validate_rating(rating: f64) -> Result<(), MovieValidationError> {
    if !rating.is_finite() {
        return Err(MovieValidationError::InvalidRating);
    }

    Ok(())
}

/// Validate a release year against the current year
pub fn validate_year(year: i32, current_year: i32) -> Result<(), MovieValidationError> {
    if year > current_year {
        return Err(MovieValidationError::YearInFuture {
            year,
            current: current_year,
        });
    }

    Ok(())
}
