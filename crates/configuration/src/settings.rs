use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub schema: SchemaSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Connection pool parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string. When absent, `DATABASE_URL` from the environment is used.
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

/// Where the DDL batch that provisions the catalog lives.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaSettings {
    #[serde(default = "default_ddl_path")]
    pub ddl_path: PathBuf,
}

/// Log filter and optional rolling file output.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Directory for daily rolling log files. Console only when absent.
    pub directory: Option<PathBuf>,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_ddl_path() -> PathBuf {
    PathBuf::from("create_data_model.sql")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    "music-sample.log".to_string()
}

// --- Default Implementations ---
// These allow a user to omit any section from their settings file.

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            ddl_path: default_ddl_path(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}

impl DatabaseSettings {
    /// Resolves the connection string, falling back to `DATABASE_URL`.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        match &self.url {
            Some(url) if !url.trim().is_empty() => Ok(url.clone()),
            Some(_) => Err(ConfigError::ValidationError(
                "database.url must not be empty.".to_string(),
            )),
            None => dotenvy::var("DATABASE_URL").map_err(|_| {
                ConfigError::ValidationError(
                    "database.url or DATABASE_URL must be set.".to_string(),
                )
            }),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Settings {
    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be greater than zero.".to_string(),
            ));
        }
        if let Some(url) = &self.database.url {
            if url.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "database.url must not be empty.".to_string(),
                ));
            }
        }
        if self.schema.ddl_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "schema.ddl_path must not be empty.".to_string(),
            ));
        }
        Ok(())
    }
}
