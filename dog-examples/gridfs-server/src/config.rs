use std::env;

use anyhow::{Context, Result};
use dog_gridfs::GridFsOptions;

/// Prefix for the GridFS environment variables (`GRIDFS_URI`, `GRIDFS_DATABASE`, ...)
pub const GRIDFS_ENV_PREFIX: &str = "GRIDFS_";

/// Settings the server needs before it can start
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub gridfs: GridFsOptions,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read HTTP and GridFS settings from the environment
pub fn config() -> Result<ServerConfig> {
    let host = env::var("HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("HTTP_PORT")
        .unwrap_or_else(|_| "3030".to_string())
        .parse::<u16>()
        .context("HTTP_PORT must be a port number")?;

    let mut gridfs = GridFsOptions::from_env(GRIDFS_ENV_PREFIX)?;
    if gridfs.app_name.is_none() {
        gridfs = gridfs.with_app_name("gridfs-server");
    }

    Ok(ServerConfig { host, port, gridfs })
}
