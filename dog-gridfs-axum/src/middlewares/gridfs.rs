use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use dog_gridfs::{
    FetchedBlob, GridError, GridFsConfig, GridFsConnection, GridFsOptions, GridResult,
    DEFAULT_CONTENT_TYPE,
};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::{GridFsHttpError, PathMatcher};

/// Middleware that serves GridFS files under `/<prefix>/<id>-<name>`.
///
/// Matching requests are answered from the bucket (any method); every other
/// request goes to the wrapped service untouched.
///
/// ```rust,no_run
/// use axum::{routing::get, Router};
/// use dog_gridfs::GridFsOptions;
/// use dog_gridfs_axum::GridFsLayer;
///
/// # async fn build() -> dog_gridfs::GridResult<Router> {
/// let options = GridFsOptions::new().with_uri("mongodb://localhost:27017/media");
/// let gridfs = GridFsLayer::connect(&options).await?;
///
/// Ok(Router::new()
///     .route("/health", get(|| async { "ok" }))
///     .layer(gridfs))
/// # }
/// ```
#[derive(Clone)]
pub struct GridFsLayer {
    connection: GridFsConnection,
    matcher: Arc<PathMatcher>,
}

impl GridFsLayer {
    pub fn new(connection: GridFsConnection) -> GridResult<Self> {
        let matcher = PathMatcher::new(connection.config().prefix())
            .map_err(|e| GridError::configuration(format!("invalid prefix: {e}")))?;

        Ok(Self {
            connection,
            matcher: Arc::new(matcher),
        })
    }

    /// Resolve `options`, connect, and build the layer.
    ///
    /// Fails on configuration or connection errors; no layer exists without a
    /// live connection.
    pub async fn connect(options: &GridFsOptions) -> GridResult<Self> {
        let connection = GridFsConnection::from_options(options).await?;
        Self::new(connection)
    }

    pub fn connection(&self) -> &GridFsConnection {
        &self.connection
    }

    pub fn config(&self) -> &GridFsConfig {
        self.connection.config()
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }
}

impl<S> Layer<S> for GridFsLayer {
    type Service = GridFsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GridFsService {
            inner,
            connection: self.connection.clone(),
            matcher: Arc::clone(&self.matcher),
        }
    }
}

#[derive(Clone)]
pub struct GridFsService<S> {
    inner: S,
    connection: GridFsConnection,
    matcher: Arc<PathMatcher>,
}

impl<S> Service<Request<Body>> for GridFsService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let Some(raw_id) = self.matcher.file_id(req.uri().path()).map(str::to_owned) else {
            return Box::pin(self.inner.call(req));
        };

        debug!(method = %req.method(), path = %req.uri().path(), "serving file from GridFS");

        let connection = self.connection.clone();
        Box::pin(async move { Ok(serve(&connection, &raw_id).await) })
    }
}

async fn serve(connection: &GridFsConnection, raw_id: &str) -> Response {
    match connection.read(raw_id).await {
        Ok(blob) => file_response(blob),
        Err(err) => GridFsHttpError(err).into_response(),
    }
}

fn file_response(blob: FetchedBlob) -> Response {
    let content_type = HeaderValue::from_str(&blob.content_type).unwrap_or_else(|_| {
        warn!(content_type = %blob.content_type, "stored content type is not a valid header value");
        HeaderValue::from_static(DEFAULT_CONTENT_TYPE)
    });

    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], blob.bytes).into_response()
}
