use async_trait::async_trait;

use crate::{FileId, GridFile, GridResult};

/// Read side of a GridFS-style file store.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait GridStore: Send + Sync {
    /// Open a file for reading.
    ///
    /// Returns [`GridError::NotFound`](crate::GridError::NotFound) when no
    /// file has this identifier.
    async fn fetch(&self, id: &FileId) -> GridResult<GridFile>;

    /// Short backend name used in log fields
    fn name(&self) -> &'static str;
}
