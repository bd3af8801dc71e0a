pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export engine types
pub use logic::{
    BookingAllocator, BoxOffice, MovieCatalog, SchedulingError, SchedulingResult,
    ShowtimeScheduler,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use crate::config::{AppConfig, StorageBackend};

/// Wrap a store in a box office and mount the HTTP routes on it.
pub fn build_app<S: Store + 'static>(store: Arc<S>) -> Router {
    routes::create_router::<S>().with_state(Arc::new(BoxOffice::new(store)))
}

/// Serve `app` on an already bound listener until ctrl-c.
pub async fn serve_app(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

async fn start<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let office = Arc::new(BoxOffice::new(store));

    if config.seed_enabled() {
        log::info!("Loading seed data...");
        seed::load_seed_data(&*office).await?;
        log::info!("Seed data loaded successfully");
    }

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Popcorn Palace running on http://{}", bind_address);

    serve_app(listener, routes::create_router::<S>().with_state(office)).await
}

/// Load configuration, open the configured backend and serve until shutdown.
pub async fn run_server() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{} backend={:?}",
        config.server.host,
        config.server.port,
        config.database.backend
    );

    match config.database.backend {
        StorageBackend::Memory => {
            log::info!("Using in-memory store");
            start(Arc::new(MemoryStore::new()), &config).await
        }
        StorageBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let postgres_store =
                PostgresStore::new(&database_url, config.max_connections()).await?;

            log::info!("Running database migrations...");
            postgres_store.migrate().await?;

            start(Arc::new(postgres_store), &config).await
        }
    }
}
