//! Static file serving for command-less mode.
//!
//! Serves the configured directory over HTTP. Missing files are 404,
//! anything that tries to escape the root is 403, and directories are never
//! listed; a directory resolves to its `index.html` or nothing. Failure to
//! bind the address is the one fatal error here and is surfaced before the
//! server task starts.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::{CliError, Result};

/// Serves files under one root directory.
pub struct StaticServer {
    root: PathBuf,
}

impl StaticServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Bind the listening socket.
    ///
    /// Kept separate from serving so a taken port aborts startup
    /// immediately instead of failing inside a background task.
    pub async fn bind(&self, host: &str, port: u16) -> Result<TcpListener> {
        TcpListener::bind((host, port))
            .await
            .map_err(|err| CliError::Server(format!("failed to bind {host}:{port}: {err}")))
    }

    /// Build the router serving this directory.
    ///
    /// CORS is wide open; this is a development server.
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(serve_file)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(Arc::new(self.root.clone()))
    }

    /// Serve connections until the shutdown future completes.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, root = %self.root.display(), "serving static files");
        }
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| CliError::Server(format!("server error: {err}")))
    }
}

/// Outcome of mapping a request path onto the served directory.
enum Resolution {
    File(PathBuf),
    Forbidden,
    NotFound,
}

async fn serve_file(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    match resolve(&root, uri.path()) {
        Resolution::File(path) => match tokio::fs::read(&path).await {
            Ok(contents) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type_for(&path))
                .header(header::CACHE_CONTROL, "no-cache")
                .body(Body::from(contents))
                .unwrap(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read file");
                plain_response(StatusCode::NOT_FOUND, "Not Found")
            }
        },
        Resolution::Forbidden => plain_response(StatusCode::FORBIDDEN, "Forbidden"),
        Resolution::NotFound => plain_response(StatusCode::NOT_FOUND, "Not Found"),
    }
}

fn plain_response(status: StatusCode, message: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain")], message).into_response()
}

/// Map a request path onto a file under `root`.
///
/// Traversal is rejected structurally (any non-normal component) and again
/// after resolution: the canonicalized target must still live under the
/// canonicalized root, which also covers symlinks pointing outside it.
fn resolve(root: &Path, request_path: &str) -> Resolution {
    let rel = Path::new(request_path.trim_start_matches('/'));

    for component in rel.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Resolution::Forbidden,
        }
    }

    let mut path = root.join(rel);
    if path.is_dir() {
        // No directory listings; a directory only answers via its index.
        path = path.join("index.html");
    }
    if !path.is_file() {
        return Resolution::NotFound;
    }

    match (path.canonicalize(), root.canonicalize()) {
        (Ok(resolved), Ok(canonical_root)) if resolved.starts_with(&canonical_root) => {
            Resolution::File(resolved)
        }
        (Ok(_), Ok(_)) => Resolution::Forbidden,
        _ => Resolution::NotFound,
    }
}

/// Content type from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "txt" | "md" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_components_are_forbidden() {
        let root = Path::new("/srv/site");
        assert!(matches!(
            resolve(root, "/../../etc/passwd"),
            Resolution::Forbidden
        ));
        assert!(matches!(
            resolve(root, "/static/../../secret"),
            Resolution::Forbidden
        ));
    }

    #[test]
    fn unknown_paths_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve(dir.path(), "/nonexistent.file"),
            Resolution::NotFound
        ));
    }

    #[test]
    fn files_resolve_and_directories_use_their_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "<html></html>").unwrap();

        assert!(matches!(resolve(dir.path(), "/app.js"), Resolution::File(_)));
        assert!(matches!(resolve(dir.path(), "/docs"), Resolution::File(_)));
        assert!(matches!(resolve(dir.path(), "/docs/"), Resolution::File(_)));
    }

    #[test]
    fn directories_without_index_are_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/logo.svg"), "<svg/>").unwrap();

        assert!(matches!(resolve(dir.path(), "/assets"), Resolution::NotFound));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_escaping_the_root_are_forbidden() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "shh").unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("leak.txt"))
            .unwrap();

        assert!(matches!(resolve(dir.path(), "/leak.txt"), Resolution::Forbidden));
    }

    #[test]
    fn content_types_cover_the_common_web_set() {
        assert_eq!(
            content_type_for(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("app.js")), "application/javascript");
        assert_eq!(content_type_for(Path::new("style.css")), "text/css");
        assert_eq!(
            content_type_for(Path::new("unknown.bin")),
            "application/octet-stream"
        );
    }
}
