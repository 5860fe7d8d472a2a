use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RepositoryRef;

/// A single-file edit to push to the remote origin. Built per user action.
#[derive(Debug, Clone)]
pub struct CommitRequest {
    pub repository: RepositoryRef,
    pub path: String,
    pub message: String,
    pub new_content: Vec<u8>,
}

/// JSON body accepted by the commit endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitBody {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub content: String,
}

impl From<CommitBody> for CommitRequest {
    fn from(body: CommitBody) -> Self {
        Self {
            repository: RepositoryRef::new(body.owner, body.repo),
            path: body.path,
            message: body.message,
            new_content: body.content.into_bytes(),
        }
    }
}

/// The remote's content hash for a file, used as the write precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileVersion {
    pub path: String,
    pub version_tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub commit_id: String,
    pub path: String,
    pub committed_at: DateTime<Utc>,
    /// Whether the committed bytes were also written to the local clone.
    pub local_synced: bool,
}
