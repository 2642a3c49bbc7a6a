use std::sync::Arc;

use tracing::debug;

use crate::{
    FetchedBlob, FileId, GridError, GridFile, GridFsConfig, GridFsOptions, GridResult, GridStore,
    MongoGridStore,
};

/// Long-lived handle to one GridFS bucket.
///
/// Built once when the serving layer is constructed and then shared by every
/// request; cloning only bumps reference counts. Nothing in it changes after
/// construction.
#[derive(Clone)]
pub struct GridFsConnection {
    config: Arc<GridFsConfig>,
    store: Arc<dyn GridStore>,
}

impl GridFsConnection {
    /// Connect to MongoDB using a resolved configuration.
    ///
    /// Fails with [`GridError::Connection`] if the server cannot be reached,
    /// rejects the credentials, or does not answer within
    /// [`GridFsConfig::connect_timeout`].
    pub async fn connect(config: GridFsConfig) -> GridResult<Self> {
        let store = MongoGridStore::connect(&config).await?;
        Ok(Self::with_store(config, store))
    }

    /// Resolve `options` and connect. Configuration errors are reported
    /// before any network I/O.
    pub async fn from_options(options: &GridFsOptions) -> GridResult<Self> {
        let config = options.resolve()?;
        Self::connect(config).await
    }

    /// Use an already constructed store
    pub fn with_store<S: GridStore + 'static>(config: GridFsConfig, store: S) -> Self {
        Self::with_shared_store(config, Arc::new(store))
    }

    pub fn with_shared_store(config: GridFsConfig, store: Arc<dyn GridStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &GridFsConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn GridStore> {
        &self.store
    }

    /// Parse `raw_id` and open the file it names.
    ///
    /// A malformed identifier yields [`GridError::InvalidId`] without touching
    /// the store; an unknown one yields [`GridError::NotFound`].
    pub async fn fetch(&self, raw_id: &str) -> GridResult<GridFile> {
        let id = FileId::parse(raw_id)?;
        debug!(%id, store = self.store.name(), "fetching file");
        self.store.fetch(&id).await
    }

    /// Fetch a file and read it fully into memory, bounded by
    /// [`GridFsConfig::read_timeout`] when one is set.
    pub async fn read(&self, raw_id: &str) -> GridResult<FetchedBlob> {
        let read = async {
            let file = self.fetch(raw_id).await?;
            file.into_blob().await
        };

        match self.config.read_timeout() {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| GridError::timeout(raw_id))?,
            None => read.await,
        }
    }
}

impl std::fmt::Debug for GridFsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridFsConnection")
            .field("config", &self.config)
            .field("store", &self.store.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryGridStore;
    use std::time::Duration;

    fn config() -> GridFsConfig {
        GridFsOptions::new().with_database("test").resolve().unwrap()
    }

    #[tokio::test]
    async fn read_returns_content_and_type() {
        let store = MemoryGridStore::new();
        let id = store.insert(Some("text/plain"), "hello").await;
        let conn = GridFsConnection::with_store(config(), store);

        let blob = conn.read(&id.to_string()).await.unwrap();
        assert_eq!(blob.content_type, "text/plain");
        assert_eq!(&blob.bytes[..], b"hello");
    }

    #[tokio::test]
    async fn malformed_and_missing_ids_stay_distinct() {
        let conn = GridFsConnection::with_store(config(), MemoryGridStore::new());

        let err = conn.read("not-an-object-id").await.unwrap_err();
        assert!(matches!(err, GridError::InvalidId { .. }));

        let err = conn.read(&FileId::new().to_string()).await.unwrap_err();
        assert!(matches!(err, GridError::NotFound { .. }));
    }

    #[tokio::test]
    async fn clones_share_the_same_store() {
        let store = Arc::new(MemoryGridStore::new());
        let conn = GridFsConnection::with_shared_store(config(), store.clone());
        let other = conn.clone();

        let id = store.insert(Some("text/plain"), "shared").await;
        assert!(other.read(&id.to_string()).await.is_ok());
        assert!(Arc::ptr_eq(conn.store(), other.store()));
    }

    #[tokio::test]
    async fn generous_read_timeout_does_not_interfere() {
        let store = MemoryGridStore::new();
        let id = store.insert(None, vec![0u8; 1024]).await;
        let config = GridFsOptions::new()
            .with_database("test")
            .with_read_timeout(Duration::from_secs(5))
            .resolve()
            .unwrap();
        let conn = GridFsConnection::with_store(config, store);

        let blob = conn.read(&id.to_string()).await.unwrap();
        assert_eq!(blob.bytes.len(), 1024);
    }
}
