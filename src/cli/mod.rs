//! CLI module for the Movie Descriptions server
//!
//! Subcommands:
//! - `serve`: run the HTTP API (default when no subcommand is given)
//! - `migrate`: apply or revert PostgreSQL schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Movie Descriptions - catalogue of movies and their categories
#[derive(Parser)]
#[command(name = "movie-descriptions-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending PostgreSQL migrations
    Migrate(migrate::MigrateArgs),
}
