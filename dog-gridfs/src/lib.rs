//! # dog-gridfs: read-only MongoDB GridFS access
//!
//! `dog-gridfs` opens one long-lived, pooled session to a MongoDB database and
//! serves files out of a GridFS bucket by identifier. It is the storage half of
//! `dog-gridfs-axum`, but has no HTTP coupling of its own.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dog_gridfs::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> GridResult<()> {
//! let options = GridFsOptions::new().with_uri("mongodb://localhost:27017/media");
//! let conn = GridFsConnection::from_options(&options).await?;
//!
//! let blob = conn.read("507f1f77bcf86cd799439011").await?;
//! println!("{} bytes of {}", blob.bytes.len(), blob.content_type);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ GridFsConnection │  ← config + shared store, built once
//! ├──────────────────┤
//! │    GridStore     │  ← MongoGridStore / MemoryGridStore
//! └──────────────────┘
//! ```
//!
//! Lookups keep their failure kinds apart ([`GridError::InvalidId`],
//! [`GridError::NotFound`], backend and I/O errors) so callers can log the
//! difference even when they answer every one of them the same way.

mod config;
mod connection;
mod error;
mod memory_store;
mod mongo_store;
pub mod store;
mod types;

pub use config::{Credentials, GridFsConfig, GridFsOptions, DEFAULT_PORT, MONGODB_SCHEME};
pub use connection::GridFsConnection;
pub use error::{ConnectTimeout, GridError, GridResult};
pub use memory_store::{MemoryGridStore, DEFAULT_CHUNK_SIZE};
pub use mongo_store::MongoGridStore;
pub use store::GridStore;
pub use types::{ByteStream, FetchedBlob, FileId, GridFile, DEFAULT_CONTENT_TYPE};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        FetchedBlob, FileId, GridError, GridFsConfig, GridFsConnection, GridFsOptions, GridResult,
        GridStore, MemoryGridStore,
    };
}
