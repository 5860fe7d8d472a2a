//! API route handlers - maps HTTP endpoints to workspace and remote operations.
//!
//! Each submodule defines routes for a feature area:
//! - `repositories`: Cloned repository listing and cloning
//! - `tree`: Recursive file tree and file content
//! - `commit`: Push an edited file to the remote origin

pub mod commit;
pub mod extract;
pub mod repositories;
pub mod tree;

use std::sync::Arc;

use axum::Router;

use crate::config::AppConfig;
use crate::remote::{CommitCoordinator, ContentApi, GitHubContentApi, RemoteError};
use crate::workspace::Workspace;

/// Shared by every handler. Holds no mutable state: the disk is the state.
#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<Workspace>,
    pub coordinator: CommitCoordinator,
}

impl AppState {
    pub fn new(workspace: Workspace, api: Arc<dyn ContentApi>) -> Self {
        Self {
            workspace: Arc::new(workspace),
            coordinator: CommitCoordinator::new(api),
        }
    }

    /// Workspace plus a GitHub client built from `config`.
    pub fn from_config(config: &AppConfig) -> std::result::Result<Self, RemoteError> {
        let api = GitHubContentApi::new(&config.remote)?;
        Ok(Self::new(Workspace::new(&config.workspace_root), Arc::new(api)))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(repositories::routes(state.clone()))
        .merge(tree::routes(state.clone()))
        .merge(commit::routes(state))
}
