use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use futures_core::Stream;
use mongodb::bson::oid::ObjectId;
use std::pin::Pin;

use crate::{GridError, GridResult};

/// Stream of bytes for file content
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Content type reported for files stored without one
pub const DEFAULT_CONTENT_TYPE: &str = "binary/octet-stream";

// Reported lengths above this are not trusted for up-front allocation.
const MAX_PREALLOCATE: u64 = 16 * 1024 * 1024;

/// Identifier of a GridFS file (a 12-byte ObjectId, 24 hex characters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(ObjectId);

impl FileId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse the textual form used in request paths.
    pub fn parse(raw: &str) -> GridResult<Self> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| GridError::invalid_id(raw))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for FileId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// A file opened for reading
pub struct GridFile {
    pub id: FileId,
    pub content_type: String,
    pub filename: Option<String>,
    pub length: u64,
    pub stream: ByteStream,
}

impl std::fmt::Debug for GridFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridFile")
            .field("id", &self.id)
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl GridFile {
    /// Drain the content stream into memory.
    pub async fn into_blob(self) -> GridResult<FetchedBlob> {
        let GridFile {
            content_type,
            length,
            mut stream,
            ..
        } = self;

        let capacity = usize::try_from(length.min(MAX_PREALLOCATE)).unwrap_or(0);
        let mut buf = BytesMut::with_capacity(capacity);
        while let Some(chunk) = stream.next().await {
            buf.extend_from_slice(&chunk?);
        }

        Ok(FetchedBlob {
            content_type,
            bytes: buf.freeze(),
        })
    }
}

/// File content fully read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBlob {
    pub content_type: String,
    pub bytes: Bytes,
}
