use serde::Deserialize;

use crate::infrastructure::storage::PostgresConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub storage: StorageSettings,
    pub cors: CorsConfig,
    pub application: ApplicationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

/// Which repositories back the catalogue
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `postgres` or `memory`
    pub backend: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Identity reported in the API document
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let pool = PostgresConfig::default();

        Self {
            url: pool.url,
            max_connections: pool.max_connections,
            min_connections: pool.min_connections,
            connect_timeout_secs: pool.connect_timeout_secs,
            idle_timeout_secs: pool.idle_timeout_secs,
            run_migrations: true,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "postgres".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Pool settings for the PostgreSQL backend
    pub fn pool_config(&self) -> PostgresConfig {
        PostgresConfig::new(&self.url)
            .with_max_connections(self.max_connections)
            .with_min_connections(self.min_connections)
            .with_connect_timeout(self.connect_timeout_secs)
            .with_idle_timeout(self.idle_timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                app_config.database.url = url;
            }
        }

        Ok(app_config)
    }
}
