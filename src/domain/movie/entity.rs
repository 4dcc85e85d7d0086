//! Movie entity and related types

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    validate_eidr_code, validate_movie_name, validate_rating, MovieValidationError,
};

/// Entertainment Identifier Registry code, the natural key of a movie
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EidrCode(String);

impl EidrCode {
    /// Create a new EidrCode after validation
    pub fn new(code: impl Into<String>) -> Result<Self, MovieValidationError> {
        let code = code.into();
        validate_eidr_code(&code)?;
        Ok(Self(code))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EidrCode {
    type Error = MovieValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EidrCode> for String {
    fn from(code: EidrCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for EidrCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication status of a movie
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovieStatus {
    #[default]
    Active,
    Inactive,
}

impl MovieStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Representation used on the wire and in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl std::fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieStatus {
    type Err = MovieValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            other => Err(MovieValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// Movie entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    eidr_code: EidrCode,
    name: String,
    rating: f64,
    year: i32,
    status: MovieStatus,
}

impl Movie {
    /// Create a new movie; the year is checked by the service against the clock
    pub fn new(
        eidr_code: EidrCode,
        name: impl Into<String>,
        rating: f64,
        year: i32,
        status: MovieStatus,
    ) -> Result<Self, MovieValidationError> {
        let name = name.into();
        validate_movie_name(&name)?;
        validate_rating(rating)?;

        Ok(Self {
            eidr_code,
            name,
            rating,
            year,
            status,
        })
    }

    // Getters

    pub fn eidr_code(&self) -> &EidrCode {
        &self.eidr_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn status(&self) -> MovieStatus {
        self.status
    }

    /// Whether the mutable fields equal the given values
    pub fn has_same_details(
        &self,
        name: &str,
        rating: f64,
        year: i32,
        status: MovieStatus,
    ) -> bool {
        self.name == name && self.rating == rating && self.year == year && self.status == status
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), MovieValidationError> {
        let name = name.into();
        validate_movie_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_rating(&mut self, rating: f64) -> Result<(), MovieValidationError> {
        validate_rating(rating)?;
        self.rating = rating;
        Ok(())
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    pub fn set_status(&mut self, status: MovieStatus) {
        self.status = status;
    }
}
