use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::AppState;
use crate::catalog::{self, AudioEntry};
use crate::error::AudioServerError;
use crate::resolver::{self, AudioInfo};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Name of the served directory, without its location on disk
    pub root: String,
    pub formats: Vec<String>,
}

/// GET /health - Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        root: state
            .root_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        formats: state.config.extensions(),
    })
}

/// GET /audio/{filename} - Stream the preferred format of an audio file
///
/// The body is streamed so large files are never held in memory.
pub async fn stream_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AudioServerError> {
    let resolved = resolver::resolve(&state.root_dir, &state.config, &filename).await?;

    debug!("Streaming audio: {}", resolved.path.display());

    let metadata = fs::metadata(&resolved.path).await?;
    let file = fs::File::open(&resolved.path).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    // Sanitize filename for Content-Disposition header
    let safe_filename = resolved.file_name().replace('"', "'");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, resolved.format.content_type()),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", safe_filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// GET /info - List every audio file and the formats it is available in
pub async fn list_info(
    State(state): State<AppState>,
) -> Result<Json<Vec<AudioEntry>>, AudioServerError> {
    let entries = catalog::list_catalog(&state.root_dir, &state.config).await?;
    debug!("Catalog listed {} entries", entries.len());
    Ok(Json(entries))
}

/// GET /info/{filename} - Describe the preferred format of one audio file
pub async fn file_info(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<AudioInfo>, AudioServerError> {
    let info = resolver::lookup_info(&state.root_dir, &state.config, &filename).await?;
    Ok(Json(info))
}
