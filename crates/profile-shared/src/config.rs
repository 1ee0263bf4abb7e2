//! Configuration management

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::types::PageLimits;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub photo_storage: PhotoStorageSettings,
    pub pagination: PaginationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub cors_origin: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PhotoStorageSettings {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub transformation: String,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PaginationSettings {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl PaginationSettings {
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingSettings {
    /// Directory for rolling JSON log files. Stdout only when unset.
    pub directory: Option<String>,
    pub file_prefix: Option<String>,
}

impl AppConfig {
    /// Loads `.env` first, then the layered sources under `./config`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new("config"))
    }

    /// Layers defaults, `<dir>/default`, `<dir>/<APP_ENV>`, then environment
    /// variables separated by `__` (e.g. `DATABASE__URL`).
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 5001)?
            .set_default("app.name", "profile-server")?
            .set_default("app.cors_origin", "http://localhost:4200")?
            .set_default("database.backend", "postgres")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("jwt.access_token_expiry", crate::constants::DEFAULT_ACCESS_TOKEN_EXPIRY)?
            .set_default("photo_storage.base_url", "https://api.cloudinary.com/v1_1")?
            .set_default("photo_storage.folder", "members")?
            .set_default("photo_storage.transformation", "c_fill,g_face,h_500,w_500")?
            .set_default("pagination.default_page_size", i64::from(DEFAULT_PAGE_SIZE))?
            .set_default("pagination.max_page_size", i64::from(MAX_PAGE_SIZE))?
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join(&env).to_string_lossy()).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_from_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[database]
backend = "memory"
url = "postgres://localhost/profiles"

[jwt]
secret = "test-secret"

[photo_storage]
cloud_name = "demo"
api_key = "key"
api_secret = "secret"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.app.port, 5001);
        assert_eq!(config.pagination.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.pagination.limits().max_page_size, MAX_PAGE_SIZE);
        assert_eq!(config.photo_storage.folder, "members");
        assert!(config.logging.directory.is_none());
    }
}
