//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod movies;
pub mod openapi;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_router, MOVIE_API_PREFIX};
pub use state::{AppState, MovieServiceTrait};
