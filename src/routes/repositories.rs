//! Workspace catalog endpoints.
//!
//! - GET /api/v1/repositories
//!   Lists every cloned repository as { owner, repo } pairs.
//!   Used by: repository list page
//!
//! - POST /api/v1/repositories/clone { repo_url: string }
//!   Clones a GitHub repository into the workspace as owner/name.
//!   Fails with 400 if the URL is not a GitHub repository or it is already cloned.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::models::{CloneRequest, CloneResponse, RepositoryListing};
use crate::routes::AppState;
use crate::routes::extract::AppJson;
use crate::workspace::parse_github_url;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repositories", get(list_repositories))
        .route("/api/v1/repositories/clone", post(clone_repository))
        .with_state(state)
}

async fn list_repositories(State(state): State<AppState>) -> Result<Json<RepositoryListing>> {
    let workspace = state.workspace.clone();
    let repositories = tokio::task::spawn_blocking(move || workspace.list_repositories())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(RepositoryListing { repositories }))
}

async fn clone_repository(
    State(state): State<AppState>,
    AppJson(request): AppJson<CloneRequest>,
) -> Result<Json<CloneResponse>> {
    let repo = parse_github_url(&request.repo_url)?;

    let workspace = state.workspace.clone();
    let url = request.repo_url.trim().to_string();
    let target = repo.clone();
    tokio::task::spawn_blocking(move || workspace.clone_repository(&url, &target))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(CloneResponse {
        message: format!("Repository {} cloned successfully!", repo),
        owner: repo.owner,
        repo: repo.name,
    }))
}
