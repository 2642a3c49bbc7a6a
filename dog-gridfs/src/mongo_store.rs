use async_trait::async_trait;
use bytes::Bytes;
use futures::io::AsyncReadExt;
use futures_core::Stream;
use mongodb::bson::{doc, Bson, Document};
use mongodb::gridfs::{GridFsBucket, GridFsDownloadStream};
use mongodb::options::{ClientOptions, Credential, GridFsBucketOptions, ServerAddress};
use mongodb::{Client, Collection, Database};
use tracing::{info, instrument};

use crate::error::ConnectTimeout;
use crate::{FileId, GridError, GridFile, GridFsConfig, GridResult, GridStore, DEFAULT_CONTENT_TYPE};

const READ_BUFFER_BYTES: usize = 64 * 1024;

/// GridFS bucket in a MongoDB database.
///
/// Wraps the driver's pooled client, so one instance serves any number of
/// concurrent lookups.
#[derive(Clone)]
pub struct MongoGridStore {
    client: Client,
    database: Database,
    bucket: GridFsBucket,
    files: Collection<Document>,
}

impl MongoGridStore {
    /// Open the client, authenticate if credentials are configured, and ping
    /// the server, all within the configured connect timeout.
    #[instrument(
        name = "gridfs.connect",
        skip(config),
        fields(host = %config.hostname(), port = config.port(), database = %config.database())
    )]
    pub async fn connect(config: &GridFsConfig) -> GridResult<Self> {
        let limit = config.connect_timeout();

        let store = match tokio::time::timeout(limit, Self::open(config)).await {
            Ok(result) => result.map_err(GridError::connection)?,
            Err(_) => return Err(GridError::connection(ConnectTimeout(limit))),
        };

        info!(bucket = %config.bucket(), "connected to MongoDB");
        Ok(store)
    }

    async fn open(config: &GridFsConfig) -> mongodb::error::Result<Self> {
        let client = Client::with_options(client_options(config))?;
        let database = client.database(config.database());

        // The driver connects lazily; ping so that reachability and
        // authentication are checked now rather than on the first request.
        database.run_command(doc! { "ping": 1 }).await?;

        let mut bucket_options = GridFsBucketOptions::default();
        bucket_options.bucket_name = Some(config.bucket().to_string());
        let bucket = database.gridfs_bucket(bucket_options);
        let files = database.collection::<Document>(&config.files_collection());

        Ok(Self {
            client,
            database,
            bucket,
            files,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

fn client_options(config: &GridFsConfig) -> ClientOptions {
    let mut options = ClientOptions::default();
    options.hosts = vec![ServerAddress::Tcp {
        host: config.hostname().to_string(),
        port: Some(config.port()),
    }];
    options.connect_timeout = Some(config.connect_timeout());
    options.server_selection_timeout = Some(config.connect_timeout());
    options.app_name = config.app_name().map(str::to_owned);

    if let Some(credentials) = config.credentials() {
        let mut credential = Credential::default();
        credential.username = Some(credentials.username.clone());
        credential.password = Some(credentials.password.clone());
        credential.source = Some(config.database().to_string());
        options.credential = Some(credential);
    }

    options
}

/// Content type from the files document: the top-level `contentType` field
/// written by older drivers, then `metadata.contentType`.
fn content_type_of(file: &Document) -> String {
    file.get_str("contentType")
        .ok()
        .or_else(|| {
            file.get_document("metadata")
                .ok()
                .and_then(|m| m.get_str("contentType").ok())
        })
        .filter(|ct| !ct.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

fn length_of(file: &Document) -> u64 {
    match file.get("length") {
        Some(Bson::Int64(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Int32(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Double(n)) if *n >= 0.0 => *n as u64,
        _ => 0,
    }
}

fn read_chunks(download: GridFsDownloadStream) -> impl Stream<Item = std::io::Result<Bytes>> + Send {
    async_stream::stream! {
        let mut download = Box::pin(download);
        let mut buf = vec![0u8; READ_BUFFER_BYTES];
        loop {
            match download.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => yield Ok(Bytes::copy_from_slice(&buf[..n])),
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl GridStore for MongoGridStore {
    async fn fetch(&self, id: &FileId) -> GridResult<GridFile> {
        let oid = id.object_id();

        let file = self
            .files
            .find_one(doc! { "_id": oid })
            .await
            .map_err(GridError::backend)?
            .ok_or_else(|| GridError::not_found(id.to_string()))?;

        let download = self
            .bucket
            .open_download_stream(Bson::ObjectId(oid))
            .await
            .map_err(GridError::backend)?;

        Ok(GridFile {
            id: *id,
            content_type: content_type_of(&file),
            filename: file.get_str("filename").ok().map(str::to_owned),
            length: length_of(&file),
            stream: Box::pin(read_chunks(download)),
        })
    }

    fn name(&self) -> &'static str {
        "mongodb"
    }
}
