use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown library, node, file or archive entry.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or conflicting caller input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Container cannot be opened: missing decompression tool or
    /// unreadable file.
    #[error("Archive unavailable: {0}")]
    ArchiveUnavailable(String),

    /// Entry missing or corrupt inside an otherwise valid container.
    #[error("Archive entry error: {0}")]
    ArchiveEntry(String),

    /// I/O error walking or reading the filesystem.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) | AppError::ArchiveEntry(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ArchiveUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!(error = %self, "Request error");

        (status, self.to_string()).into_response()
    }
}

/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, AppError>;
