use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{ServerOverrides, Settings, init_tracing, load_config, load_config_from};
use database::{PgExecutor, connect, run_migrations, seed};
use std::path::PathBuf;

/// The main entry point for the Newsdesk application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; settings may come from the environment.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let mut settings = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let _guard = init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(overrides) => {
            overrides.apply(&mut settings.server);
            settings.validate()?;
            tracing::info!(
                host = %settings.server.host,
                port = settings.server.port,
                "Starting server."
            );
            web_server::run_server(settings).await
        }
        Commands::Migrate => handle_migrate(&settings).await,
        Commands::Seed => handle_seed(&settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A REST backend for a news aggregator: topics, articles, comments and users.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read settings from this file instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServerOverrides),
    /// Apply pending schema migrations and exit.
    Migrate,
    /// Migrate, then replace all data with the fixture set.
    Seed,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_migrate(settings: &Settings) -> anyhow::Result<()> {
    let pool = connect(&web_server::connection_settings(&settings.database))
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&pool).await.context("Failed to run database migrations")?;
    pool.close().await;
    tracing::info!("Schema is up to date.");
    Ok(())
}

async fn handle_seed(settings: &Settings) -> anyhow::Result<()> {
    let pool = connect(&web_server::connection_settings(&settings.database))
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&pool).await.context("Failed to run database migrations")?;

    let executor = PgExecutor::new(pool);
    let report = seed(&executor).await.context("Failed to seed the database")?;
    tracing::info!(
        topics = report.topics,
        users = report.users,
        articles = report.articles,
        comments = report.comments,
        "Seed complete."
    );
    executor.close().await;
    Ok(())
}
