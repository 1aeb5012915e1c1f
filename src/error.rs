use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AudioServerError {
    #[error("Audio file not found: {0}")]
    NotFound(String),

    #[error("File name escapes the audio directory")]
    PathTraversal,

    #[error("Could not read audio directory: {0}")]
    DirectoryUnreadable(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            AudioServerError::NotFound(_) => StatusCode::NOT_FOUND,
            AudioServerError::PathTraversal => StatusCode::FORBIDDEN,
            AudioServerError::DirectoryUnreadable(_) | AudioServerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain-text body sent to the client. Never includes filesystem detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AudioServerError::NotFound(_) => "File not found",
            AudioServerError::PathTraversal => "Invalid file name",
            AudioServerError::DirectoryUnreadable(_) => "Could not read audio directory",
            AudioServerError::Io(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AudioServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }

        (status, self.public_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AudioServerError::NotFound("song".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AudioServerError::PathTraversal.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AudioServerError::DirectoryUnreadable(std::io::Error::other("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_is_plain_text() {
        let response = AudioServerError::NotFound("song".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/plain"));
    }
}
