use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use configuration::{ArticleSettings, DatabaseSettings, Settings};
use database::{ConnectionSettings, NewsRepository, PgExecutor, QueryExecutor, QuerySettings};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod endpoints;
pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState<E = PgExecutor> {
    pub repo: NewsRepository<E>,
}

impl<E: QueryExecutor> AppState<E> {
    pub fn new(repo: NewsRepository<E>) -> Self {
        Self { repo }
    }
}

/// Translates the `[database]` section into pool settings.
pub fn connection_settings(database: &DatabaseSettings) -> ConnectionSettings {
    ConnectionSettings {
        url: database.url.clone(),
        max_connections: database.max_connections,
        acquire_timeout: database.acquire_timeout(),
    }
}

pub fn query_settings(articles: &ArticleSettings) -> QuerySettings {
    QuerySettings {
        default_limit: articles.default_limit,
        total_count: articles.total_count,
    }
}

/// Builds the full route table over any executor.
pub fn router<E>(state: Arc<AppState<E>>) -> Router
where
    E: QueryExecutor + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api", get(handlers::get_endpoints))
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/topics",
            get(handlers::get_topics::<E>).post(handlers::post_topic::<E>),
        )
        .route(
            "/api/articles",
            get(handlers::get_articles::<E>).post(handlers::post_article::<E>),
        )
        .route(
            "/api/articles/:article_id",
            get(handlers::get_article::<E>)
                .patch(handlers::patch_article::<E>)
                .delete(handlers::delete_article::<E>),
        )
        .route(
            "/api/articles/:article_id/comments",
            get(handlers::get_article_comments::<E>).post(handlers::post_article_comment::<E>),
        )
        .route(
            "/api/comments/:comment_id",
            get(handlers::route_not_found)
                .patch(handlers::patch_comment::<E>)
                .delete(handlers::delete_comment::<E>),
        )
        .route("/api/users", get(handlers::get_users::<E>))
        .route("/api/users/:username", get(handlers::get_user::<E>))
        .fallback(handlers::route_not_found)
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Connects to the database and serves the API until Ctrl-C.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let addr = settings.server.socket_addr()?;

    let pool = database::connect(&connection_settings(&settings.database)).await?;
    if settings.database.run_migrations {
        database::run_migrations(&pool).await?;
    }
    let executor = PgExecutor::new(pool);
    let repo = NewsRepository::with_settings(executor.clone(), query_settings(&settings.articles));

    let app = router(Arc::new(AppState::new(repo)));

    tracing::info!("Web server started and listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    executor.close().await;
    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
    }
}
