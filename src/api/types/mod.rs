//! Request and response plumbing shared by the handlers

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::{validation_error, Json, ValidatedJson};
