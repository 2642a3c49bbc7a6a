use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use dog_gridfs::GridError;
use tracing::{debug, warn};

/// Body sent for every failed lookup
pub const NOT_FOUND_BODY: &str = "File not found.";

/// A failed file lookup on its way out as an HTTP response.
///
/// Every lookup failure becomes the same `404 text/plain` answer so clients
/// cannot probe the identifier format. The underlying kind is logged here,
/// where the distinction is dropped.
#[derive(Debug)]
pub struct GridFsHttpError(pub GridError);

impl From<GridError> for GridFsHttpError {
    fn from(e: GridError) -> Self {
        Self(e)
    }
}

impl IntoResponse for GridFsHttpError {
    fn into_response(self) -> Response {
        match &self.0 {
            GridError::InvalidId { id } => debug!(%id, "rejecting malformed file id"),
            GridError::NotFound { id } => debug!(%id, "file not found"),
            err => warn!(error = %err, "file lookup failed"),
        }

        not_found()
    }
}

/// The `404 File not found.` response
pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        NOT_FOUND_BODY,
    )
        .into_response()
}
