//! Remote origin access.
//!
//! - `github`: `ContentApi` over the GitHub REST contents endpoint
//! - `coordinator`: two-phase optimistic-concurrency commit of one file
//! - `error`: `RemoteError`, what a content API can report

pub mod coordinator;
pub mod error;
pub mod github;

use async_trait::async_trait;

use crate::models::{RemoteFileVersion, RepositoryRef};

pub use coordinator::{CommitAttempt, CommitCoordinator, CommitState};
pub use error::{RemoteError, RemoteResult};
pub use github::GitHubContentApi;

/// A conditional single-file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpdate {
    pub repository: RepositoryRef,
    pub path: String,
    pub message: String,
    /// New file content, Base64 encoded.
    pub content: String,
    /// Version the remote file must still be at for the write to apply.
    pub version_tag: String,
}

/// Third-party content API holding the remote origin.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Current version tag of `path`, or `RemoteError::NotFound`.
    async fn fetch_version(&self, repo: &RepositoryRef, path: &str) -> RemoteResult<RemoteFileVersion>;

    /// Applies `update` if the remote is still at `update.version_tag`.
    /// Returns the new commit id; a stale tag yields `RemoteError::Conflict`.
    async fn put_content(&self, update: &ContentUpdate) -> RemoteResult<String>;
}
