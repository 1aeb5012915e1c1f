//! Test utilities and common setup.

use std::path::Path;

use audioserver::{AppState, Config, create_router};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response},
};
use tempfile::TempDir;
use tower::ServiceExt;

/// Create a temporary audio directory holding `files`.
///
/// Each file's content is its own name so responses can be matched to files.
pub fn audio_dir(files: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for file in files {
        std::fs::write(temp_dir.path().join(file), file.as_bytes()).unwrap();
    }
    temp_dir
}

/// Create a test application serving `root` with the default configuration.
pub fn test_app(root: &Path) -> Router {
    test_app_with_config(root, Config::default())
}

pub fn test_app_with_config(root: &Path, config: Config) -> Router {
    let state = AppState::with_config(root.to_path_buf(), config);
    create_router(state)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .method(Method::GET)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}
