//! dog-gridfs-axum: serve MongoDB GridFS files from an Axum app.
//!
//! [`GridFsLayer`] wraps any router or service. Requests for
//! `/<prefix>/<id>-<name>` are answered from GridFS; everything else is
//! passed through unchanged.

pub mod matcher;
pub mod middlewares;
mod error;

pub use error::{not_found, GridFsHttpError, NOT_FOUND_BODY};
pub use matcher::PathMatcher;
pub use middlewares::{GridFsLayer, GridFsService};
