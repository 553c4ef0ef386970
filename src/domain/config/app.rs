use std::path::PathBuf;

use thiserror::Error;

pub const MEMORY_DATABASE_URL: &str = "memory://";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/upload_db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 10;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{name} must be greater than zero")]
    MustBePositive { name: &'static str },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub max_files_per_upload: usize,
    pub max_upload_bytes: usize,
    pub public_base_url: Option<String>,
    pub reconcile_on_startup: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            cors_allowed_origins: None,
            max_files_per_upload: DEFAULT_MAX_FILES_PER_UPLOAD,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            public_base_url: None,
            reconcile_on_startup: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source, falling back to
    /// defaults for unset or blank values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();

        let port = match get("PORT") {
            Some(value) => parse_number("PORT", &value)?,
            None => defaults.port,
        };

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(value) => positive("DB_MAX_CONNECTIONS", parse_number("DB_MAX_CONNECTIONS", &value)?)?,
            None => defaults.db_max_connections,
        };

        let max_files_per_upload = match get("MAX_FILES_PER_UPLOAD") {
            Some(value) => positive(
                "MAX_FILES_PER_UPLOAD",
                parse_number("MAX_FILES_PER_UPLOAD", &value)?,
            )?,
            None => defaults.max_files_per_upload,
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(value) => positive("MAX_UPLOAD_BYTES", parse_number("MAX_UPLOAD_BYTES", &value)?)?,
            None => defaults.max_upload_bytes,
        };

        let reconcile_on_startup = match get("RECONCILE_ON_STARTUP") {
            Some(value) => parse_bool("RECONCILE_ON_STARTUP", &value)?,
            None => defaults.reconcile_on_startup,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            port,
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections,
            cors_allowed_origins,
            max_files_per_upload,
            max_upload_bytes,
            public_base_url: get("PUBLIC_BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            reconcile_on_startup,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn positive<T: PartialOrd + Default>(name: &'static str, value: T) -> Result<T, ConfigError> {
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::MustBePositive { name })
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
