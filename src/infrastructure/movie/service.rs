//! Movie service for catalogue management

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{debug, info};

use crate::domain::movie::{total_pages, validate_year, MAX_PAGE_SIZE};
use crate::domain::{
    Category, CategoryId, CategoryRepository, DomainError, EidrCode, Movie, MovieQuery,
    MovieRepository, MovieStatus, MovieTableRow, MovieValidationError,
};

/// Request for creating or updating a movie
#[derive(Debug, Clone, PartialEq)]
pub struct SaveMovieRequest {
    pub eidr_code: String,
    pub name: String,
    pub rating: f64,
    pub year: i32,
    pub status: MovieStatus,
    pub category_ids: Vec<CategoryId>,
}

/// A movie together with its categories ordered by id
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub movie: Movie,
    pub categories: Vec<Category>,
}

/// One page of the movie table
#[derive(Debug, Clone, PartialEq)]
pub struct MovieTablePage {
    pub rows: Vec<MovieTableRow>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Movie service for managing the catalogue
#[derive(Debug)]
pub struct MovieService<M: MovieRepository + ?Sized, C: CategoryRepository + ?Sized> {
    movies: Arc<M>,
    categories: Arc<C>,
}

impl<M: MovieRepository + ?Sized, C: CategoryRepository + ?Sized> MovieService<M, C> {
    /// Create a new movie service
    pub fn new(movies: Arc<M>, categories: Arc<C>) -> Self {
        Self { movies, categories }
    }

    /// List every category
    pub async fn get_categories(&self) -> Result<Vec<Category>, DomainError> {
        debug!("Listing categories");
        self.categories.list().await
    }

    /// Filtered, ordered and paginated movie table
    pub async fn get_movies_table(&self, query: MovieQuery) -> Result<MovieTablePage, DomainError> {
        let query = MovieQuery {
            page: query.page.max(1),
            page_size: query.page_size.clamp(1, MAX_PAGE_SIZE),
            ..query
        };

        debug!(
            page = query.page,
            page_size = query.page_size,
            "Searching movie table"
        );

        let result = self.movies.search(&query).await?;

        Ok(MovieTablePage {
            total_pages: total_pages(result.total_items, query.page_size),
            rows: result.rows,
            page: query.page,
            page_size: query.page_size,
            total_items: result.total_items,
        })
    }

    /// Get one movie with its categories
    pub async fn get_movie(&self, eidr_code: &str) -> Result<MovieDetails, DomainError> {
        debug!(eidr_code = %eidr_code, "Getting movie");

        let code = parse_eidr_code(eidr_code)?;
        let movie = self
            .movies
            .get(&code)
            .await?
            .ok_or_else(|| DomainError::not_found(does_not_exist(eidr_code)))?;

        self.with_categories(movie).await
    }

    /// Every movie with the given name, each with its categories
    pub async fn get_movies_by_name(&self, name: &str) -> Result<Vec<MovieDetails>, DomainError> {
        debug!(name = %name, "Getting movies by name");

        let movies = self.movies.find_by_name(name).await?;
        let mut details = Vec::with_capacity(movies.len());

        for movie in movies {
            details.push(self.with_categories(movie).await?);
        }

        Ok(details)
    }

    /// Create a new movie
    pub async fn create_movie(&self, request: SaveMovieRequest) -> Result<MovieDetails, DomainError> {
        let code = parse_eidr_code(&request.eidr_code)?;

        if self.movies.exists(&code).await? {
            return Err(DomainError::conflict(format!(
                "Movie with eidrCode {} already exists.",
                request.eidr_code
            )));
        }

        let (category_ids, categories) = self.checked_categories(&request).await?;

        info!(
            eidr_code = %request.eidr_code,
            name = %request.name,
            categories = ?category_ids,
            "Creating movie"
        );

        let movie = Movie::new(
            code,
            request.name,
            request.rating,
            request.year,
            request.status,
        )?;

        let movie = self.movies.create(movie, category_ids).await?;

        Ok(MovieDetails { movie, categories })
    }

    /// Update an existing movie
    ///
    /// Only changed state is written: the row when a field differs, the
    /// category links when the requested set differs from the current one.
    pub async fn update_movie(&self, request: SaveMovieRequest) -> Result<MovieDetails, DomainError> {
        let code = parse_eidr_code(&request.eidr_code)?;

        let mut movie = self
            .movies
            .get(&code)
            .await?
            .ok_or_else(|| DomainError::not_found(does_not_exist(&request.eidr_code)))?;

        let (category_ids, categories) = self.checked_categories(&request).await?;

        let details_changed =
            !movie.has_same_details(&request.name, request.rating, request.year, request.status);

        let current: BTreeSet<CategoryId> = self
            .categories
            .for_movie(&code)
            .await?
            .iter()
            .map(|c| c.id())
            .collect();
        let requested: BTreeSet<CategoryId> = category_ids.iter().copied().collect();
        let categories_changed = current != requested;

        if !details_changed && !categories_changed {
            debug!(eidr_code = %request.eidr_code, "Movie unchanged");
            return Ok(MovieDetails { movie, categories });
        }

        info!(
            eidr_code = %request.eidr_code,
            details_changed,
            categories_changed,
            "Updating movie"
        );

        movie.set_name(request.name)?;
        movie.set_rating(request.rating)?;
        movie.set_year(request.year);
        movie.set_status(request.status);

        let links = categories_changed.then_some(category_ids);
        let movie = self.movies.update(&movie, links).await?;

        Ok(MovieDetails { movie, categories })
    }

    /// Delete all given movies or none of them
    pub async fn delete_movies(&self, eidr_codes: Vec<String>) -> Result<bool, DomainError> {
        let mut seen = BTreeSet::new();
        let mut codes = Vec::with_capacity(eidr_codes.len());

        for code in eidr_codes {
            if seen.insert(code.clone()) {
                codes.push(parse_eidr_code(&code)?);
            }
        }

        if codes.is_empty() {
            return Err(DomainError::validation("No movies to delete."));
        }

        info!(eidr_codes = ?seen, "Deleting movies");

        self.movies.delete_many(codes).await?;

        Ok(true)
    }

    async fn with_categories(&self, movie: Movie) -> Result<MovieDetails, DomainError> {
        let categories = self.categories.for_movie(movie.eidr_code()).await?;
        Ok(MovieDetails { movie, categories })
    }

    /// Checks the year and the categories of a request
    ///
    /// Returns the de-duplicated ids in request order and the matching
    /// categories ordered by id.
    async fn checked_categories(
        &self,
        request: &SaveMovieRequest,
    ) -> Result<(Vec<CategoryId>, Vec<Category>), DomainError> {
        validate_year(request.year, current_year())?;

        if request.category_ids.is_empty() {
            return Err(MovieValidationError::NoCategories.into());
        }

        let mut seen = BTreeSet::new();
        let category_ids: Vec<CategoryId> = request
            .category_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let categories = self.categories.get_many(&category_ids).await?;
        if categories.len() != category_ids.len() {
            return Err(DomainError::validation("Some categories do not exist."));
        }

        Ok((category_ids, categories))
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

fn parse_eidr_code(value: &str) -> Result<EidrCode, DomainError> {
    EidrCode::new(value).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn does_not_exist(eidr_code: &str) -> String {
    format!("Movie with eidrCode {} does not exist.", eidr_code)
}
