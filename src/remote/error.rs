use thiserror::Error;

/// Failures reported by a `ContentApi` implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The remote has no file at the requested path.
    #[error("{0} not found on remote")]
    NotFound(String),

    /// The supplied version tag no longer matches the remote file.
    #[error("version conflict: {0}")]
    Conflict(String),

    /// Network failure, timeout, malformed body or any other error status.
    #[error("{0}")]
    Transport(String),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
