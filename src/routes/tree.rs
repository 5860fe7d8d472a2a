use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{FileContentResponse, RepositoryRef, TreeResponse};
use crate::routes::AppState;
use crate::routes::extract::AppQuery;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository/tree", get(get_tree))
        .route("/api/v1/repository/file", get(get_file_content))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TreeQuery {
    owner: Option<String>,
    repo: Option<String>,
}

async fn get_tree(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TreeQuery>,
) -> Result<Json<TreeResponse>> {
    let repo = RepositoryRef::new(query.owner.unwrap_or_default(), query.repo.unwrap_or_default());

    // Walks the whole repository; keep it off the async workers
    let workspace = state.workspace.clone();
    let files = tokio::task::spawn_blocking(move || workspace.list_tree(&repo))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(TreeResponse { files }))
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    owner: Option<String>,
    repo: Option<String>,
    path: Option<String>,
}

async fn get_file_content(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FileQuery>,
) -> Result<Json<FileContentResponse>> {
    let repo = RepositoryRef::new(query.owner.unwrap_or_default(), query.repo.unwrap_or_default());
    let path = query.path.unwrap_or_default();

    let workspace = state.workspace.clone();
    let content = tokio::task::spawn_blocking(move || workspace.read_text(&repo, &path))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(Json(FileContentResponse { content }))
}
