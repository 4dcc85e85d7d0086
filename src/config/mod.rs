//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, ApplicationConfig, CorsConfig, DatabaseConfig, LogFormat, LoggingConfig,
    ServerConfig, StorageSettings,
};
