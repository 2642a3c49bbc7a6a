use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use dog_gridfs::{GridFsConnection, GridFsOptions, MemoryGridStore};
use dog_gridfs_axum::GridFsLayer;
use gridfs_server::router;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn app(store: Arc<MemoryGridStore>) -> axum::Router {
    let config = GridFsOptions::new().with_database("media").resolve().unwrap();
    let layer = GridFsLayer::new(GridFsConnection::with_shared_store(config, store)).unwrap();
    router(layer)
}

#[tokio::test]
async fn health_ok() {
    let app = app(Arc::new(MemoryGridStore::new())).await;

    let res = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(body_text(res).await, "ok");
}

#[tokio::test]
async fn serves_gridfs_file_through_the_full_stack() {
    let store = Arc::new(MemoryGridStore::new());
    let id = store.insert(Some("text/markdown"), "# notes").await;
    let app = app(store).await;

    let res = app.oneshot(get(&format!("/gridfs/{id}-notes.md"))).await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.headers()["content-type"], "text/markdown");
    assert_eq!(body_text(res).await, "# notes");
}

#[tokio::test]
async fn unknown_gridfs_file_is_404_text() {
    let app = app(Arc::new(MemoryGridStore::new())).await;

    let res = app.oneshot(get("/gridfs/507f1f77bcf86cd799439011-gone.txt")).await.unwrap();

    assert_eq!(res.status().as_u16(), 404);
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert_eq!(body_text(res).await, "File not found.");
}

#[tokio::test]
async fn unknown_route_still_reaches_the_router() {
    let app = app(Arc::new(MemoryGridStore::new())).await;

    let res = app.oneshot(get("/nope")).await.unwrap();

    assert_eq!(res.status().as_u16(), 404);
    assert_eq!(body_text(res).await, "");
}

#[tokio::test]
async fn invalid_uri_scheme_stops_startup() {
    let config = gridfs_server::ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        gridfs: GridFsOptions::new().with_uri("redis://localhost:6379/0"),
    };

    let err = gridfs_server::build(&config).await.unwrap_err();
    assert!(err.to_string().contains("scheme"));
}
