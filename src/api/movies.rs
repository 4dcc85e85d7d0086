//! Movie catalogue endpoints

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiErrorResponse, Json, ValidatedJson};
use crate::domain::movie::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::{
    Category, CategoryId, MovieOrderBy, MovieQuery, MovieStatus, MovieTableRow, SortDirection,
};
use crate::infrastructure::movie::{MovieDetails, MovieTablePage, SaveMovieRequest};

pub const MOVIE_TAG: &str = "movie";

/// Category of movies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id(),
            name: category.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub eidr_code: String,
    pub name: String,
    pub rating: f64,
    pub year: i32,
    pub status: MovieStatus,
}

/// A movie with its categories ordered by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetMovieResponse {
    pub movie: MovieDto,
    pub categories: Vec<CategoryResponse>,
}

impl From<&MovieDetails> for GetMovieResponse {
    fn from(details: &MovieDetails) -> Self {
        let movie = &details.movie;

        Self {
            movie: MovieDto {
                eidr_code: movie.eidr_code().to_string(),
                name: movie.name().to_string(),
                rating: movie.rating(),
                year: movie.year(),
                status: movie.status(),
            },
            categories: details.categories.iter().map(CategoryResponse::from).collect(),
        }
    }
}

/// Row of the movie table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieTableRowDto {
    pub eidr_code: String,
    pub name: String,
    pub rating: f64,
    pub year: i32,
    pub status: MovieStatus,
    /// Category names joined with ", "
    pub categories: String,
}

impl From<MovieTableRow> for MovieTableRowDto {
    fn from(row: MovieTableRow) -> Self {
        Self {
            eidr_code: row.eidr_code.into(),
            name: row.name,
            rating: row.rating,
            year: row.year,
            status: row.status,
            categories: row.categories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetMovieTableResult {
    pub movies: Vec<MovieTableRowDto>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl From<MovieTablePage> for GetMovieTableResult {
    fn from(page: MovieTablePage) -> Self {
        Self {
            movies: page.rows.into_iter().map(MovieTableRowDto::from).collect(),
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        }
    }
}

/// Filters, ordering and paging of the movie table
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetMoviesFilter {
    /// Keep movies in any of these categories
    pub category_ids: Option<Vec<CategoryId>>,
    /// Case-insensitive part of the EIDR code
    pub eidr_code: Option<String>,
    /// Case-insensitive part of the name
    pub name: Option<String>,
    pub show_only_activated: Option<bool>,
    /// 1-based page number, defaults to 1
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    /// Defaults to 5, capped at 100
    #[validate(range(min = 1))]
    pub page_size: Option<u32>,
    pub order_by: Option<MovieOrderBy>,
    pub direction: Option<SortDirection>,
}

impl From<GetMoviesFilter> for MovieQuery {
    fn from(filter: GetMoviesFilter) -> Self {
        Self {
            category_ids: filter.category_ids.unwrap_or_default(),
            eidr_code: filter.eidr_code,
            name: filter.name,
            only_active: filter.show_only_activated.unwrap_or(false),
            page: filter.page.unwrap_or(DEFAULT_PAGE),
            page_size: filter.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
            order_by: filter.order_by.unwrap_or_default(),
            direction: filter.direction.unwrap_or_default(),
        }
    }
}

/// Movie to create or update; every field is required
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    #[validate(required)]
    pub eidr_code: Option<String>,
    #[validate(required)]
    pub name: Option<String>,
    #[validate(required)]
    pub rating: Option<f64>,
    #[validate(required)]
    pub year: Option<i32>,
    #[validate(required)]
    pub status: Option<MovieStatus>,
    /// Category ids, at least one
    #[validate(required, length(min = 1))]
    pub categories: Option<Vec<CategoryId>>,
}

pub type CreateMovieRequest = MovieRequest;
pub type UpdateMovieRequest = MovieRequest;

impl MovieRequest {
    fn into_save_request(self) -> Result<SaveMovieRequest, ApiError> {
        fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
            value.ok_or_else(|| {
                ApiError::bad_request(format!("Invalid request: {}: required", field))
                    .with_param(field)
            })
        }

        Ok(SaveMovieRequest {
            eidr_code: required(self.eidr_code, "eidrCode")?,
            name: required(self.name, "name")?,
            rating: required(self.rating, "rating")?,
            year: required(self.year, "year")?,
            status: required(self.status, "status")?,
            category_ids: required(self.categories, "categories")?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMoviesRequest {
    #[validate(required, length(min = 1))]
    pub eidr_codes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct EidrCodeParams {
    /// EIDR code of the movie
    pub eidr_code: String,
}

/// GET /api/movie/get-categories
#[utoipa::path(
    get,
    path = "/get-categories",
    tag = MOVIE_TAG,
    responses(
        (status = OK, description = "All categories ordered by id", body = [CategoryResponse]),
        (status = INTERNAL_SERVER_ERROR, description = "Storage failure", body = ApiErrorResponse),
    )
)]
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    info!("Getting all categories");

    let categories = state.movie_service.get_categories().await?;

    Ok(Json(categories.iter().map(CategoryResponse::from).collect()))
}

/// POST /api/movie/get-movies-table
#[utoipa::path(
    post,
    path = "/get-movies-table",
    tag = MOVIE_TAG,
    request_body = GetMoviesFilter,
    responses(
        (status = OK, description = "One page of the movie table", body = GetMovieTableResult),
        (status = BAD_REQUEST, description = "Invalid filter", body = ApiErrorResponse),
    )
)]
pub async fn get_movies_table(
    State(state): State<AppState>,
    ValidatedJson(filter): ValidatedJson<GetMoviesFilter>,
) -> Result<Json<GetMovieTableResult>, ApiError> {
    info!("Getting movies table");

    let page = state.movie_service.get_movies_table(filter.into()).await?;

    Ok(Json(page.into()))
}

/// GET /api/movie/get-movie?eidrCode=
#[utoipa::path(
    get,
    path = "/get-movie",
    tag = MOVIE_TAG,
    params(EidrCodeParams),
    responses(
        (status = OK, description = "The movie and its categories", body = GetMovieResponse),
        (status = BAD_REQUEST, description = "Unknown movie", body = ApiErrorResponse),
    )
)]
pub async fn get_movie(
    State(state): State<AppState>,
    params: Result<Query<EidrCodeParams>, QueryRejection>,
) -> Result<Json<GetMovieResponse>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::bad_request(e.body_text()).with_param("eidrCode"))?;

    debug!(eidr_code = %params.eidr_code, "Getting movie");

    let details = state.movie_service.get_movie(&params.eidr_code).await?;

    Ok(Json(GetMovieResponse::from(&details)))
}

/// GET /api/movie/get-by-eidr/{eidrCode}
#[utoipa::path(
    get,
    path = "/get-by-eidr/{eidrCode}",
    tag = MOVIE_TAG,
    params(("eidrCode" = String, Path, description = "EIDR code of the movie")),
    responses(
        (status = OK, description = "The movie and its categories", body = GetMovieResponse),
        (status = BAD_REQUEST, description = "Unknown movie", body = ApiErrorResponse),
    )
)]
pub async fn get_by_eidr(
    State(state): State<AppState>,
    Path(eidr_code): Path<String>,
) -> Result<Json<GetMovieResponse>, ApiError> {
    debug!(eidr_code = %eidr_code, "Getting movie by EIDR code");

    let details = state.movie_service.get_movie(&eidr_code).await?;

    Ok(Json(GetMovieResponse::from(&details)))
}

/// GET /api/movie/get-by-name/{name}
#[utoipa::path(
    get,
    path = "/get-by-name/{name}",
    tag = MOVIE_TAG,
    params(("name" = String, Path, description = "Exact movie name, case-insensitive")),
    responses(
        (status = OK, description = "Movies with that name", body = [GetMovieResponse]),
    )
)]
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<GetMovieResponse>>, ApiError> {
    debug!(name = %name, "Getting movies by name");

    let movies = state.movie_service.get_movies_by_name(&name).await?;

    Ok(Json(movies.iter().map(GetMovieResponse::from).collect()))
}

/// POST /api/movie/create-movie
#[utoipa::path(
    post,
    path = "/create-movie",
    tag = MOVIE_TAG,
    request_body = CreateMovieRequest,
    responses(
        (status = OK, description = "The created movie", body = GetMovieResponse),
        (status = BAD_REQUEST, description = "Invalid movie", body = ApiErrorResponse),
    )
)]
pub async fn create_movie(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateMovieRequest>,
) -> Result<Json<GetMovieResponse>, ApiError> {
    let request = request.into_save_request()?;
    info!(name = %request.name, "Creating movie");

    let details = state.movie_service.create_movie(request).await?;

    Ok(Json(GetMovieResponse::from(&details)))
}

/// PUT /api/movie/update-movie
#[utoipa::path(
    put,
    path = "/update-movie",
    tag = MOVIE_TAG,
    request_body = UpdateMovieRequest,
    responses(
        (status = OK, description = "The updated movie", body = GetMovieResponse),
        (status = BAD_REQUEST, description = "Invalid movie", body = ApiErrorResponse),
    )
)]
pub async fn update_movie(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateMovieRequest>,
) -> Result<Json<GetMovieResponse>, ApiError> {
    let request = request.into_save_request()?;
    info!(eidr_code = %request.eidr_code, "Updating movie");

    let details = state.movie_service.update_movie(request).await?;

    Ok(Json(GetMovieResponse::from(&details)))
}

/// DELETE /api/movie/delete-movies
#[utoipa::path(
    delete,
    path = "/delete-movies",
    tag = MOVIE_TAG,
    request_body = DeleteMoviesRequest,
    responses(
        (status = OK, description = "All movies were deleted", body = bool),
        (status = BAD_REQUEST, description = "Some movies do not exist", body = ApiErrorResponse),
    )
)]
pub async fn delete_movies(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<DeleteMoviesRequest>,
) -> Result<Json<bool>, ApiError> {
    let eidr_codes = request.eidr_codes.unwrap_or_default();
    info!(eidr_codes = ?eidr_codes, "Deleting movies");

    let deleted = state.movie_service.delete_movies(eidr_codes).await?;

    Ok(Json(deleted))
}

/// Routes mounted under `/api/movie`
pub fn movie_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_categories))
        .routes(routes!(get_movies_table))
        .routes(routes!(get_movie))
        .routes(routes!(get_by_eidr))
        .routes(routes!(get_by_name))
        .routes(routes!(create_movie))
        .routes(routes!(update_movie))
        .routes(routes!(delete_movies))
}
