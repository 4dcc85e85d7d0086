//! Storage infrastructure - Backend selection, pooling and migrations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageConfig, StorageFactory, StorageType};
pub use in_memory::{CatalogData, InMemoryCatalog};
pub use migrations::{run_storage_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{
    begin_serializable, commit, connect_pool, storage_error, write_error, PostgresConfig,
};
