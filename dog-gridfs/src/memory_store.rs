use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::{ByteStream, FileId, GridError, GridFile, GridResult, GridStore, DEFAULT_CONTENT_TYPE};

/// Chunk size GridFS uses by default (255 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 255 * 1024;

#[derive(Debug, Clone)]
struct StoredFile {
    content_type: Option<String>,
    filename: Option<String>,
    data: Bytes,
}

/// In-process store, handy for tests and local development.
///
/// Content is handed out in GridFS-sized chunks so readers see the same
/// stream shape as with a real bucket.
#[derive(Debug)]
pub struct MemoryGridStore {
    files: RwLock<HashMap<FileId, StoredFile>>,
    chunk_size: usize,
}

impl MemoryGridStore {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Store `data` under a freshly generated identifier
    pub async fn insert<B: Into<Bytes>>(&self, content_type: Option<&str>, data: B) -> FileId {
        let id = FileId::new();
        self.insert_with_id(id, content_type, None, data).await;
        id
    }

    /// Store `data` under a caller-chosen identifier, replacing any previous file
    pub async fn insert_with_id<B: Into<Bytes>>(
        &self,
        id: FileId,
        content_type: Option<&str>,
        filename: Option<&str>,
        data: B,
    ) {
        let file = StoredFile {
            content_type: content_type.map(str::to_owned),
            filename: filename.map(str::to_owned),
            data: data.into(),
        };
        self.files.write().await.insert(id, file);
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }

    fn chunked(&self, data: Bytes) -> ByteStream {
        let chunk_size = self.chunk_size.max(1);
        let chunks: Vec<std::io::Result<Bytes>> = (0..data.len())
            .step_by(chunk_size)
            .map(|start| Ok(data.slice(start..(start + chunk_size).min(data.len()))))
            .collect();
        Box::pin(futures::stream::iter(chunks))
    }
}

impl Default for MemoryGridStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GridStore for MemoryGridStore {
    async fn fetch(&self, id: &FileId) -> GridResult<GridFile> {
        let file = self
            .files
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| GridError::not_found(id.to_string()))?;

        Ok(GridFile {
            id: *id,
            content_type: file
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            filename: file.filename,
            length: file.data.len() as u64,
            stream: self.chunked(file.data),
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
