//! JSON extractors that report rejections in the API error format

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::error::ApiError;

/// JSON extractor whose rejections are API errors
///
/// Every body problem is answered with 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(ApiError::bad_request(format_rejection_message(&rejection))
                .with_code("json_parse_error")),
        }
    }
}

/// Format the rejection message to be more user-friendly
fn format_rejection_message(rejection: &axum::extract::rejection::JsonRejection) -> String {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

/// JSON extractor that also runs the body's `validator` rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate().map_err(validation_error)?;

        Ok(ValidatedJson(value))
    }
}

/// Turn `validator` errors into a 400 naming every offending field
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |err| {
                let reason = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                (field.clone(), reason)
            })
        })
        .collect();
    fields.sort();

    let message = fields
        .iter()
        .map(|(field, reason)| format!("{}: {}", field, reason))
        .collect::<Vec<_>>()
        .join("; ");

    let mut error = ApiError::new(
        StatusCode::BAD_REQUEST,
        super::error::ApiErrorType::InvalidRequestError,
        format!("Invalid request: {}", message),
    )
    .with_code("validation_error");

    if let Some((field, _)) = fields.first() {
        error = error.with_param(field.clone());
    }

    error
}

/// Field names as they appear on the wire, `page_size` -> `pageSize`
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;

    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestStruct {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(range(min = 1))]
        size: u32,
    }

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct PagedStruct {
        #[validate(range(min = 1))]
        page_size: u32,
        #[validate(length(min = 1))]
        eidr_codes: Vec<String>,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_syntax_error_is_bad_request() {
        let result = Json::<TestStruct>::from_request(json_request("{"), &()).await;

        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("Invalid JSON syntax"));
    }

    #[tokio::test]
    async fn test_json_data_error_names_field() {
        let result =
            Json::<TestStruct>::from_request(json_request(r#"{"name":"x"}"#), &()).await;

        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message().contains("size"));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();

        let err = Json::<TestStruct>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_validated_json_rejects_invalid_fields() {
        let result =
            ValidatedJson::<TestStruct>::from_request(json_request(r#"{"name":"","size":0}"#), &())
                .await;

        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message().contains("name: must not be empty"));
        assert!(err.message().contains("size: range"));
        assert_eq!(err.response.error.param.as_deref(), Some("name"));
    }

    #[tokio::test]
    async fn test_validation_error_uses_wire_field_names() {
        let result = ValidatedJson::<PagedStruct>::from_request(
            json_request(r#"{"pageSize":0,"eidrCodes":[]}"#),
            &(),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(
            err.message(),
            "Invalid request: eidrCodes: length; pageSize: range"
        );
        assert_eq!(err.response.error.param.as_deref(), Some("eidrCodes"));
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("page_size"), "pageSize");
        assert_eq!(camel_case("show_only_activated"), "showOnlyActivated");
        assert_eq!(camel_case("name"), "name");
        assert_eq!(camel_case("_leading"), "leading");
    }

    #[tokio::test]
    async fn test_validated_json_accepts_valid_body() {
        let ValidatedJson(value) =
            ValidatedJson::<TestStruct>::from_request(json_request(r#"{"name":"a","size":2}"#), &())
                .await
                .unwrap();

        assert_eq!(value.name, "a");
        assert_eq!(value.size, 2);
    }

    #[test]
    fn test_json_into_inner() {
        let json = Json(42);
        assert_eq!(json.into_inner(), 42);
        assert_eq!(*Json("hello"), "hello");
    }
}
