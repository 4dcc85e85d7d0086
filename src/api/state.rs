//! Application state for shared services

use std::sync::Arc;

use crate::domain::{Category, CategoryRepository, DomainError, MovieQuery, MovieRepository};
use crate::infrastructure::movie::{MovieDetails, MovieService, MovieTablePage, SaveMovieRequest};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub movie_service: Arc<dyn MovieServiceTrait>,
}

impl AppState {
    pub fn new(movie_service: Arc<dyn MovieServiceTrait>) -> Self {
        Self { movie_service }
    }
}

/// Trait for movie catalogue operations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieServiceTrait: Send + Sync {
    async fn get_categories(&self) -> Result<Vec<Category>, DomainError>;
    async fn get_movies_table(&self, query: MovieQuery) -> Result<MovieTablePage, DomainError>;
    async fn get_movie(&self, eidr_code: &str) -> Result<MovieDetails, DomainError>;
    async fn get_movies_by_name(&self, name: &str) -> Result<Vec<MovieDetails>, DomainError>;
    async fn create_movie(&self, request: SaveMovieRequest) -> Result<MovieDetails, DomainError>;
    async fn update_movie(&self, request: SaveMovieRequest) -> Result<MovieDetails, DomainError>;
    async fn delete_movies(&self, eidr_codes: Vec<String>) -> Result<bool, DomainError>;
}

#[async_trait::async_trait]
impl<M, C> MovieServiceTrait for MovieService<M, C>
where
    M: MovieRepository + ?Sized + 'static,
    C: CategoryRepository + ?Sized + 'static,
{
    async fn get_categories(&self) -> Result<Vec<Category>, DomainError> {
        MovieService::get_categories(self).await
    }

    async fn get_movies_table(&self, query: MovieQuery) -> Result<MovieTablePage, DomainError> {
        MovieService::get_movies_table(self, query).await
    }

    async fn get_movie(&self, eidr_code: &str) -> Result<MovieDetails, DomainError> {
        MovieService::get_movie(self, eidr_code).await
    }

    async fn get_movies_by_name(&self, name: &str) -> Result<Vec<MovieDetails>, DomainError> {
        MovieService::get_movies_by_name(self, name).await
    }

    async fn create_movie(&self, request: SaveMovieRequest) -> Result<MovieDetails, DomainError> {
        MovieService::create_movie(self, request).await
    }

    async fn update_movie(&self, request: SaveMovieRequest) -> Result<MovieDetails, DomainError> {
        MovieService::update_movie(self, request).await
    }

    async fn delete_movies(&self, eidr_codes: Vec<String>) -> Result<bool, DomainError> {
        MovieService::delete_movies(self, eidr_codes).await
    }
}
