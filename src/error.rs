//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` enum for all error conditions and implements Axum's
//! `IntoResponse` to automatically convert errors to appropriate HTTP responses
//! with JSON error bodies.
//!
//! Error mappings:
//! - `InvalidRequest`, `InvalidPath` → 400 (fix your input)
//! - `RepoNotFound`, `PathNotFound`, `RemoteFileMissing` → 404
//! - `ConcurrentModification` → 409 (re-fetch and try again)
//! - `Transport`, `Git`, `Io`, `Internal` → 500 (something is wrong upstream)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Remote file missing: {0}")]
    RemoteFileMissing(String),

    #[error("Concurrent modification of {0}: the remote file changed since it was read")]
    ConcurrentModification(String),

    #[error("Remote service error: {0}")]
    Transport(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable discriminator sent alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::InvalidPath(_) => "invalid_path",
            AppError::RepoNotFound(_) | AppError::PathNotFound(_) => "not_found",
            AppError::RemoteFileMissing(_) => "remote_file_missing",
            AppError::ConcurrentModification(_) => "conflict",
            AppError::Transport(_) => "transport",
            AppError::Git(_) | AppError::Io(_) | AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            AppError::RepoNotFound(_)
            | AppError::PathNotFound(_)
            | AppError::RemoteFileMissing(_) => StatusCode::NOT_FOUND,
            AppError::ConcurrentModification(_) => StatusCode::CONFLICT,
            AppError::Transport(_)
            | AppError::Git(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", self);
        }

        let error_message = match &self {
            // Upstream messages are passed through verbatim for diagnosis
            AppError::Transport(msg) | AppError::Internal(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
