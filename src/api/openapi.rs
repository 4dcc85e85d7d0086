//! OpenAPI document

use utoipa::OpenApi;

use crate::config::ApplicationConfig;

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/v3/api-docs";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Movie Descriptions",
        description = "API for Movie Descriptions Application"
    ),
    tags(
        (name = "movie", description = "Movie catalogue"),
        (name = "system", description = "Health probes"),
    )
)]
pub struct ApiDoc;

/// Base document titled and versioned after the running application
pub fn api_doc(application: &ApplicationConfig) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = format!("Movie Descriptions ({})", application.name);
    doc.info.version = application.version.clone();
    doc
}
