//! Migrate command - applies or reverts the PostgreSQL schema

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{connect_pool, Migrator, PostgresMigrator};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MigrateArgs {
    /// Revert the most recent migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

/// Run the migrations against the configured database
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    if config.database.url.trim().is_empty() {
        anyhow::bail!("database.url or DATABASE_URL is required to run migrations");
    }

    let pool = connect_pool(&config.database.pool_config()).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.revert {
        migrator.revert().await?;
    } else {
        migrator.run().await?;
    }

    match migrator.version().await? {
        Some(version) => info!(version, "Database schema is at version {}", version),
        None => info!("Database schema has no migrations applied"),
    }

    Ok(())
}
