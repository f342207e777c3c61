use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/shopping_list";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from SHOPLIST_CONFIG path (TOML) if present, with reasonable defaults.
    /// DATABASE_URL, when set, wins over the file's `database.url`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SHOPLIST_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let cfg = Self::from_path(&path)?;
        Ok(cfg.with_database_url(std::env::var("DATABASE_URL").ok()))
    }

    /// Read a TOML file; a missing file yields the defaults.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<AppConfig>(s)?)
    }

    /// Override the database URL when one is given.
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.database.get_or_insert_with(DatabaseConfig::default).url = Some(url);
        }
        self
    }

    /// Get database URL (default postgres://localhost/shopping_list)
    pub fn database_url(&self) -> String {
        self.database
            .as_ref()
            .and_then(|d| d.url.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }

    pub fn max_connections(&self) -> u32 {
        self.database
            .as_ref()
            .and_then(|d| d.max_connections)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    pub fn acquire_timeout(&self) -> Duration {
        let secs = self
            .database
            .as_ref()
            .and_then(|d| d.acquire_timeout_secs)
            .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}
