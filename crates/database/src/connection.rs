use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

/// How to reach the database and how large the pool may grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Falls back to the `DATABASE_URL` environment variable when unset.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl ConnectionSettings {
    /// Resolves the connection URL, consulting `.env` and the process
    /// environment when none was configured.
    pub fn resolve_url(&self) -> Result<String, DbError> {
        if let Some(url) = self.url.as_deref().filter(|url| !url.trim().is_empty()) {
            return Ok(url.to_string());
        }
        // A missing .env file is fine; the variable may come from the environment.
        let _ = dotenv();
        env::var("DATABASE_URL")
            .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))
    }
}

/// Establishes a connection pool to the PostgreSQL database.
pub async fn connect(settings: &ConnectionSettings) -> Result<PgPool, DbError> {
    let database_url = settings.resolve_url()?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections = settings.max_connections, "Database pool established.");
    Ok(pool)
}

/// Applies the schema migrations embedded from `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}
