mod config;

use anyhow::Result;
use axum::{routing::get, Router};
use dog_gridfs_axum::GridFsLayer;
use tower_http::trace::TraceLayer;

pub use config::{config, ServerConfig, GRIDFS_ENV_PREFIX};

/// Application routes, with GridFS mounted in front of them
pub fn router(gridfs: GridFsLayer) -> Router {
    Router::new()
        .route("/", get(|| async { "gridfs-server" }))
        .route("/health", get(|| async { "ok" }))
        .layer(gridfs)
        .layer(TraceLayer::new_for_http())
}

/// Connect to MongoDB and assemble the router.
///
/// Fails if the configuration is invalid or the server cannot be reached
/// within the connect timeout.
pub async fn build(config: &ServerConfig) -> Result<Router> {
    let gridfs = GridFsLayer::connect(&config.gridfs).await?;

    tracing::info!(
        host = %gridfs.config().hostname(),
        port = gridfs.config().port(),
        database = %gridfs.config().database(),
        prefix = %gridfs.config().prefix(),
        "GridFS mounted"
    );

    Ok(router(gridfs))
}
