//! Workspace catalog DTOs.
//!
//! - `RepositorySummary`: One cloned repository (owner + name)
//! - `RepositoryListing`: Response of the repository listing endpoint
//! - `CloneRequest` / `CloneResponse`: Clone endpoint body and reply

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryListing {
    pub repositories: Vec<RepositorySummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloneRequest {
    #[serde(default)]
    pub repo_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneResponse {
    pub message: String,
    pub owner: String,
    pub repo: String,
}
