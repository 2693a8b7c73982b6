use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{
    ArticleSettings, DatabaseSettings, LoggingSettings, ServerOverrides, ServerSettings, Settings,
};
pub use telemetry::init_tracing;

/// Environment variables override the file, e.g. `NEWSDESK__SERVER__PORT=8080`.
const ENV_PREFIX: &str = "NEWSDESK";
const ENV_SEPARATOR: &str = "__";

/// Loads the application configuration from `config.toml` in the working
/// directory, if present, then from the environment.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(File::with_name("config.toml").required(false));
    finish(builder)
}

/// Like `load_config`, but the file at `path` must exist.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder().add_source(File::from(path).required(true));
    finish(builder)
}

/// Parses settings from TOML text, without consulting the environment.
pub fn parse_config(toml: &str) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = config.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TotalCountMode;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = parse_config("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.articles.default_limit, 10);
        assert_eq!(settings.articles.total_count, TotalCountMode::Page);
        assert!(settings.database.run_migrations);
    }

    #[test]
    fn sections_override_defaults() {
        let settings = parse_config(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://localhost/nc_news_test"
            max_connections = 4

            [articles]
            default_limit = 25
            total_count = "matching"

            [logging]
            level = "debug"
            directory = "logs"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.socket_addr().unwrap().port(), 8080);
        assert_eq!(settings.database.url.as_deref(), Some("postgres://localhost/nc_news_test"));
        assert_eq!(settings.database.max_connections, 4);
        assert_eq!(settings.database.acquire_timeout_secs, 5);
        assert_eq!(settings.articles.default_limit, 25);
        assert_eq!(settings.articles.total_count, TotalCountMode::Matching);
        assert_eq!(settings.logging.directory.as_deref(), Some(Path::new("logs")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for toml in [
            "[server]\nport = 0",
            "[server]\nhost = \"not a host\"",
            "[articles]\ndefault_limit = 0",
            "[database]\nmax_connections = 0",
        ] {
            assert!(
                matches!(parse_config(toml), Err(ConfigError::ValidationError(_))),
                "{toml}"
            );
        }
    }

    #[test]
    fn unknown_total_count_mode_fails_to_load() {
        let err = parse_config("[articles]\ntotal_count = \"everything\"").unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut server = ServerSettings::default();
        ServerOverrides {
            host: None,
            port: Some(3000),
        }
        .apply(&mut server);
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3000);
    }
}
