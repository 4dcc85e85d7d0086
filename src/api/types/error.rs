//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Error categories reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(
        status: StatusCode,
        error_type: ApiErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// Missing resource; reported as a bad request like every business-rule violation
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::NotFoundError, message)
            .with_code("not_found")
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    pub fn message(&self) -> &str {
        &self.response.error.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self, "Request failed");
        } else {
            warn!(status = %self.status, error = %self, "Request rejected");
        }

        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::InvalidId { message } => Self::bad_request(message).with_param("eidrCode"),
            DomainError::Conflict { message } => Self::bad_request(message).with_code("conflict"),
            DomainError::Configuration { message }
            | DomainError::Storage { message }
            | DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Year cannot be in the future.");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.message(), "Year cannot be in the future.");
    }

    #[test]
    fn test_api_error_with_param() {
        let err = ApiError::bad_request("Invalid value")
            .with_param("pageSize")
            .with_code("range");

        assert_eq!(err.response.error.param, Some("pageSize".to_string()));
        assert_eq!(err.response.error.code, Some("range".to_string()));
    }

    #[test]
    fn test_domain_error_mapping() {
        let not_found: ApiError = DomainError::not_found("Movie missing").into();
        assert_eq!(not_found.status, StatusCode::BAD_REQUEST);
        assert_eq!(not_found.response.error.error_type, ApiErrorType::NotFoundError);
        assert_eq!(not_found.response.error.code.as_deref(), Some("not_found"));

        let conflict: ApiError = DomainError::conflict("exists").into();
        assert_eq!(conflict.status, StatusCode::BAD_REQUEST);
        assert_eq!(conflict.response.error.code.as_deref(), Some("conflict"));

        let validation: ApiError = DomainError::validation("bad").into();
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            validation.response.error.error_type,
            ApiErrorType::InvalidRequestError
        );

        let invalid_id: ApiError = DomainError::invalid_id("bad code").into();
        assert_eq!(invalid_id.response.error.param.as_deref(), Some("eidrCode"));

        for err in [
            DomainError::storage("db down"),
            DomainError::internal("oops"),
            DomainError::configuration("bad config"),
        ] {
            let api_err: ApiError = err.into();
            assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(api_err.response.error.error_type, ApiErrorType::ServerError);
        }
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::not_found("Movie with eidrCode 1 does not exist.");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "not_found_error");
        assert_eq!(json["error"]["message"], "Movie with eidrCode 1 does not exist.");
        assert_eq!(json["error"]["code"], "not_found");
        assert!(json["error"].get("param").is_none());
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
