use crate::error::ConfigError;
use core_types::{DEFAULT_LIMIT, TotalCountMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; omitted values take the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub articles: ArticleSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Rejects values that would only fail later, at bind or query time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError("server.port must be non-zero".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if self.articles.default_limit == 0 {
            return Err(ConfigError::ValidationError(
                "articles.default_limit must be at least 1".into(),
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9090,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("invalid server address: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// When unset, `DATABASE_URL` from the environment (or `.env`) is used.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
            run_migrations: true,
        }
    }
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Listing behaviour for `/api/articles` and its comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArticleSettings {
    pub default_limit: u32,
    pub total_count: TotalCountMode,
}

impl Default for ArticleSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            total_count: TotalCountMode::Page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Also write daily-rotated log files into this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,tower_http=debug".to_string(),
            directory: None,
        }
    }
}

/// Command-line overrides for `ServerSettings`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ServerOverrides {
    /// Interface to bind, e.g. 127.0.0.1.
    #[cfg_attr(feature = "clap", arg(long))]
    pub host: Option<String>,
    /// Port to listen on.
    #[cfg_attr(feature = "clap", arg(long))]
    pub port: Option<u16>,
}

impl ServerOverrides {
    pub fn apply(self, server: &mut ServerSettings) {
        if let Some(host) = self.host {
            server.host = host;
        }
        if let Some(port) = self.port {
            server.port = port;
        }
    }
}
