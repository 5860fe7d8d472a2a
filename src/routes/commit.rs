//! Commit endpoint.
//!
//! - POST /api/v1/repository/commit { owner, repo, path, message, content }
//!   Pushes the edited file to the GitHub origin, conditioned on the remote
//!   version read just before the write. 409 means someone else committed
//!   first; re-read the file and try again.
//!   Used by: editor view "Commit" button

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{CommitBody, CommitReceipt, CommitRequest, RepositoryRef};
use crate::routes::AppState;
use crate::routes::extract::AppJson;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository/commit", post(commit_file))
        .with_state(state)
}

async fn commit_file(
    State(state): State<AppState>,
    AppJson(body): AppJson<CommitBody>,
) -> Result<Json<CommitReceipt>> {
    let request = CommitRequest::from(body);

    // Spawned so that a client hanging up cannot cancel a write already sent
    let task = tokio::spawn(async move {
        let attempt = state.coordinator.attempt(&request).await;
        let path = attempt.path().to_string();
        let commit_id = attempt.into_result()?;

        let local_synced =
            sync_local_copy(&state, request.repository, path.clone(), request.new_content).await;

        Ok::<_, AppError>(CommitReceipt {
            commit_id,
            path,
            committed_at: Utc::now(),
            local_synced,
        })
    });

    let receipt = task.await.map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(Json(receipt))
}

/// Mirrors committed bytes into the local clone. Failure here does not undo
/// the remote commit, so it is only reported.
async fn sync_local_copy(
    state: &AppState,
    repo: RepositoryRef,
    path: String,
    content: Vec<u8>,
) -> bool {
    let workspace = state.workspace.clone();
    let written = tokio::task::spawn_blocking(move || {
        workspace
            .write_file(&repo, &path, &content)
            .map_err(|e| format!("{}/{}: {}", repo, path, e))
    })
    .await;

    match written {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!("Committed but the local copy was not updated: {}", e);
            false
        }
        Err(e) => {
            tracing::warn!("Local copy update did not finish: {}", e);
            false
        }
    }
}
