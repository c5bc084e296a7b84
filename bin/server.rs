// Wedding Planner - Web Server

use anyhow::{Context, Result};
use tracing::{info, warn};
use wedding_planner::{api, init_logging, Config, Planner, RecordStore};

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_logging(config.logging.verbosity);

    let data_dir = &config.storage.data_dir;
    info!("Data directory: {}", data_dir.display());

    let planner = Planner::new(RecordStore::open(data_dir));
    for collection in planner.health() {
        if collection.status.is_unreadable() {
            warn!(
                file = collection.file,
                "Collection is unreadable; it will show as empty and refuse edits until fixed"
            );
        }
    }

    let app = api::router(planner, config.server.permissive_cors);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind_addr))?;

    info!("Server running on http://{}", config.server.bind_addr);
    info!("API: http://{}/api/dashboard", config.server.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
