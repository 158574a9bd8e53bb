use std::sync::Arc;

use cinemood_api::{
    config::Config,
    db,
    routes::create_router,
    services::providers::{tmdb::TmdbProvider, CatalogProvider},
    AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration from the environment
    let config = Config::from_env()?;

    // Initialize the database and seed the default moods
    let pool = db::init_database(&config.database_url).await?;

    // Initialize application state
    let catalog: Arc<dyn CatalogProvider> = Arc::new(TmdbProvider::new(&config));
    let state = AppState {
        db: pool,
        catalog,
        config: Arc::new(config.clone()),
    };

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
