use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

use super::health::health_router;
use super::middleware::{logging_middleware, security_headers_middleware, MAX_BODY_SIZE};
use super::movies::movie_router;
use super::openapi::{api_doc, DOCS_PATH, OPENAPI_JSON_PATH};
use super::state::AppState;
use crate::config::{AppConfig, CorsConfig};

pub const MOVIE_API_PREFIX: &str = "/api/movie";

/// Create the full router with application state
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let (api_routes, doc) = OpenApiRouter::with_openapi(api_doc(&config.application))
        .nest(MOVIE_API_PREFIX, movie_router())
        .merge(health_router())
        .with_state(state)
        .split_for_parts();

    let doc_json = doc.clone();

    Router::new()
        .merge(api_routes)
        .merge(Scalar::with_url(DOCS_PATH, doc))
        .route(
            OPENAPI_JSON_PATH,
            get(move || async move { axum::Json(doc_json) }),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(&config.cors))
}

/// CORS for the configured browser origins; `*` allows any origin
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::state::MockMovieServiceTrait;
    use crate::domain::Category;

    fn app(config: &AppConfig) -> Router {
        let mut service = MockMovieServiceTrait::new();
        service
            .expect_get_categories()
            .returning(|| Ok(vec![Category::new(1, "Action")]));

        create_router(AppState::new(Arc::new(service)), config)
    }

    #[tokio::test]
    async fn test_openapi_json_lists_movie_routes() {
        let response = app(&AppConfig::default())
            .oneshot(
                Request::builder()
                    .uri(OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/api/movie/get-categories",
            "/api/movie/get-movies-table",
            "/api/movie/get-movie",
            "/api/movie/create-movie",
            "/api/movie/update-movie",
            "/api/movie/delete-movies",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc["info"]["title"]
            .as_str()
            .unwrap()
            .starts_with("Movie Descriptions"));
    }

    #[tokio::test]
    async fn test_docs_page_is_served() {
        let response = app(&AppConfig::default())
            .oneshot(Request::builder().uri(DOCS_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = app(&AppConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/api/movie/get-categories")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let response = app(&AppConfig::default())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/movie/get-categories")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_unknown_origin() {
        let response = app(&AppConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/api/movie/get-categories")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_wildcard() {
        let mut config = AppConfig::default();
        config.cors.allowed_origins = vec!["*".to_string()];

        let response = app(&config)
            .oneshot(
                Request::builder()
                    .uri("/api/movie/get-categories")
                    .header(header::ORIGIN, "http://anywhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
