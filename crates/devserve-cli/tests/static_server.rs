//! Static server semantics: status codes, traversal denial, no listings.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use devserve_cli::dev::StaticServer;
use tempfile::TempDir;
use tower::ServiceExt;

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        "<html><body>home</body></html>",
    )
    .unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/style.css"), "body {}").unwrap();
    dir
}

async fn get(dir: &TempDir, path: &str) -> axum::response::Response {
    let router = StaticServer::new(dir.path()).router();
    router
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn root_serves_the_index() {
    let dir = site();
    let response = get(&dir, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(std::str::from_utf8(&body).unwrap().contains("home"));
}

#[tokio::test]
async fn nested_files_are_served_with_their_content_type() {
    let dir = site();
    let response = get(&dir, "/assets/style.css").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
}

#[tokio::test]
async fn missing_files_are_404() {
    let dir = site();
    let response = get(&dir, "/nonexistent.file").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn traversal_is_403() {
    let dir = site();
    let response = get(&dir, "/../../etc/passwd").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(&dir, "/assets/../../outside.txt").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn directories_are_not_listed() {
    let dir = site();
    // assets/ exists and has files, but no index.html.
    let response = get(&dir, "/assets").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn taken_port_is_a_fatal_bind_error() {
    let dir = site();
    let first = StaticServer::new(dir.path())
        .bind("127.0.0.1", 0)
        .await
        .unwrap();
    let port = first.local_addr().unwrap().port();

    let err = StaticServer::new(dir.path())
        .bind("127.0.0.1", port)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to bind"));
}
