use crate::error::ConfigError;
use config::builder::{ConfigBuilder, DefaultState};

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LogFormat, LoggingSettings, SchemaSettings, Settings};

/// Names the settings file to load, like a framework's settings-module variable.
pub const SETTINGS_ENV_VAR: &str = "MUSIC_SAMPLE_SETTINGS";
/// Settings file looked up when `MUSIC_SAMPLE_SETTINGS` is unset (any supported extension).
pub const DEFAULT_SETTINGS_NAME: &str = "settings";
/// Prefix of environment overrides, e.g. `MUSIC_SAMPLE__DATABASE__MAX_CONNECTIONS=10`.
pub const ENV_PREFIX: &str = "MUSIC_SAMPLE";

/// Loads the application settings from the file named by `MUSIC_SAMPLE_SETTINGS`.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let name = std::env::var(SETTINGS_ENV_VAR).unwrap_or_else(|_| DEFAULT_SETTINGS_NAME.to_string());
    load_settings_from(&name)
}

/// Loads settings from an optional file `name` layered under environment overrides.
///
/// A missing file is not an error: every section has defaults.
pub fn load_settings_from(name: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
    finish(builder)
}

/// Parses settings from TOML text, without environment overrides.
pub fn parse_settings(toml: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml));
    finish(builder)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_settings_fall_back_to_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.database.acquire_timeout_secs, 5);
        assert!(settings.database.url.is_none());
        assert_eq!(settings.schema.ddl_path, PathBuf::from("create_data_model.sql"));
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, LogFormat::Full);
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let settings = parse_settings(
            r#"
            [database]
            url = "postgres://localhost:5432/music"
            max_connections = 2

            [logging]
            level = "debug"
            format = "compact"
            directory = "logs"
            "#,
        )
        .unwrap();
        assert_eq!(settings.database.max_connections, 2);
        assert_eq!(settings.database.acquire_timeout_secs, 5);
        assert_eq!(
            settings.database.database_url().unwrap(),
            "postgres://localhost:5432/music"
        );
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.logging.directory, Some(PathBuf::from("logs")));
        assert_eq!(settings.logging.file_prefix, "music-sample.log");
    }

    #[test]
    fn zero_connections_is_rejected() {
        let result = parse_settings("[database]\nmax_connections = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn blank_url_is_rejected() {
        let result = parse_settings("[database]\nurl = \"  \"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn missing_settings_file_is_not_an_error() {
        let settings = load_settings_from("this-settings-file-does-not-exist").unwrap();
        assert!(settings.database.max_connections > 0);
    }
}
