//! Single-file commit against the remote origin with optimistic concurrency.
//!
//! One attempt walks this state machine:
//!
//! ```text
//! Idle -> Fetching -> Submitting -> Committed | Rejected | Failed
//!              \-> Failed (remote file missing, transport failure)
//! ```
//!
//! The version tag fetched in `Fetching` is sent back as the write
//! precondition. Nothing here locks: a writer that slips in between the two
//! calls makes the remote refuse the write, which surfaces as `Rejected`.
//! There is no retry; the caller re-reads and decides.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{AppError, Result};
use crate::models::{CommitRequest, RepositoryRef};
use crate::remote::{ContentApi, ContentUpdate, RemoteError};
use crate::workspace::normalize_relative;
use crate::workspace::resolve::validate_segment;

#[derive(Debug)]
pub enum CommitState {
    Idle,
    Fetching,
    Submitting { version_tag: String },
    Committed { commit_id: String },
    Rejected { version_tag: String },
    Failed { error: AppError },
}

impl CommitState {
    pub fn name(&self) -> &'static str {
        match self {
            CommitState::Idle => "idle",
            CommitState::Fetching => "fetching",
            CommitState::Submitting { .. } => "submitting",
            CommitState::Committed { .. } => "committed",
            CommitState::Rejected { .. } => "rejected",
            CommitState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CommitState::Committed { .. } | CommitState::Rejected { .. } | CommitState::Failed { .. }
        )
    }
}

/// The record of one commit attempt and where it ended up.
#[derive(Debug)]
pub struct CommitAttempt {
    repository: RepositoryRef,
    path: String,
    state: CommitState,
    /// Names of every state visited, in order.
    history: Vec<&'static str>,
}

impl CommitAttempt {
    fn new(request: &CommitRequest) -> Self {
        Self {
            repository: request.repository.clone(),
            path: request.path.clone(),
            state: CommitState::Idle,
            history: vec![CommitState::Idle.name()],
        }
    }

    fn transition(&mut self, next: CommitState) {
        tracing::debug!(
            repository = %self.repository,
            path = %self.path,
            "commit {} -> {}",
            self.state.name(),
            next.name()
        );
        self.history.push(next.name());
        self.state = next;
    }

    pub fn state(&self) -> &CommitState {
        &self.state
    }

    pub fn history(&self) -> &[&'static str] {
        &self.history
    }

    /// Normalized repository-relative path the attempt targeted.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The new commit id, or the error the attempt ended with.
    pub fn into_result(self) -> Result<String> {
        match self.state {
            CommitState::Committed { commit_id } => Ok(commit_id),
            CommitState::Rejected { .. } => Err(AppError::ConcurrentModification(self.path)),
            CommitState::Failed { error } => Err(error),
            other => Err(AppError::Internal(format!(
                "commit attempt stopped in state {}",
                other.name()
            ))),
        }
    }
}

#[derive(Clone)]
pub struct CommitCoordinator {
    api: Arc<dyn ContentApi>,
}

impl CommitCoordinator {
    pub fn new(api: Arc<dyn ContentApi>) -> Self {
        Self { api }
    }

    /// Pushes `request` and returns the new remote commit id.
    pub async fn commit(&self, request: &CommitRequest) -> Result<String> {
        self.attempt(request).await.into_result()
    }

    /// Runs one attempt to completion and returns it in a terminal state.
    pub async fn attempt(&self, request: &CommitRequest) -> CommitAttempt {
        let mut attempt = CommitAttempt::new(request);

        // Invalid input never reaches the network
        let path = match validate(request) {
            Ok(path) => path,
            Err(error) => {
                attempt.transition(CommitState::Failed { error });
                return attempt;
            }
        };
        attempt.path = path.clone();
        let repo = &request.repository;

        attempt.transition(CommitState::Fetching);
        let fetched = self.api.fetch_version(repo, &path).await;
        let version = match fetched {
            Ok(version) => version,
            Err(RemoteError::NotFound(_)) => {
                tracing::warn!("Commit to {}/{} refused: file does not exist remotely", repo, path);
                attempt.transition(CommitState::Failed {
                    error: AppError::RemoteFileMissing(path),
                });
                return attempt;
            }
            Err(e) => {
                tracing::warn!("Fetching remote version of {}/{} failed: {}", repo, path, e);
                attempt.transition(CommitState::Failed {
                    error: AppError::Transport(e.to_string()),
                });
                return attempt;
            }
        };

        let update = ContentUpdate {
            repository: repo.clone(),
            path: path.clone(),
            message: request.message.clone(),
            content: BASE64.encode(&request.new_content),
            version_tag: version.version_tag.clone(),
        };
        attempt.transition(CommitState::Submitting {
            version_tag: version.version_tag,
        });

        let submitted = self.api.put_content(&update).await;
        let next = match submitted {
            Ok(commit_id) => {
                tracing::info!("Committed {}/{} as {}", repo, path, commit_id);
                CommitState::Committed { commit_id }
            }
            Err(RemoteError::Conflict(message)) => {
                tracing::warn!(
                    "Commit to {}/{} rejected, remote moved past {}: {}",
                    repo,
                    path,
                    update.version_tag,
                    message
                );
                CommitState::Rejected {
                    version_tag: update.version_tag,
                }
            }
            Err(e) => {
                tracing::warn!("Submitting {}/{} failed: {}", repo, path, e);
                CommitState::Failed {
                    error: AppError::Transport(e.to_string()),
                }
            }
        };
        attempt.transition(next);
        debug_assert!(attempt.state.is_terminal());
        attempt
    }
}

/// Checks every required field and returns the normalized path.
fn validate(request: &CommitRequest) -> Result<String> {
    validate_segment("owner", &request.repository.owner)?;
    validate_segment("repository name", &request.repository.name)?;
    let path = normalize_relative(&request.path)?;

    if request.message.trim().is_empty() {
        return Err(AppError::InvalidRequest("Commit message is required".to_string()));
    }
    if request.new_content.is_empty() {
        return Err(AppError::InvalidRequest("File content is required".to_string()));
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemoteFileVersion;
    use crate::remote::RemoteResult;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted content API counting every call it receives.
    struct FakeApi {
        fetch: RemoteResult<String>,
        put: RemoteResult<String>,
        fetch_calls: AtomicUsize,
        put_calls: AtomicUsize,
        last_update: Mutex<Option<ContentUpdate>>,
    }

    impl FakeApi {
        fn new(fetch: RemoteResult<&str>, put: RemoteResult<&str>) -> Arc<Self> {
            Arc::new(Self {
                fetch: fetch.map(str::to_string),
                put: put.map(str::to_string),
                fetch_calls: AtomicUsize::new(0),
                put_calls: AtomicUsize::new(0),
                last_update: Mutex::new(None),
            })
        }

        fn calls(&self) -> (usize, usize) {
            (
                self.fetch_calls.load(Ordering::SeqCst),
                self.put_calls.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl ContentApi for FakeApi {
        async fn fetch_version(&self, _repo: &RepositoryRef, path: &str) -> RemoteResult<RemoteFileVersion> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            self.fetch.clone().map(|version_tag| RemoteFileVersion {
                path: path.to_string(),
                version_tag,
            })
        }

        async fn put_content(&self, update: &ContentUpdate) -> RemoteResult<String> {
            self.put_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_update.lock().unwrap() = Some(update.clone());
            self.put.clone()
        }
    }

    fn request(path: &str, message: &str, content: &str) -> CommitRequest {
        CommitRequest {
            repository: RepositoryRef::new("octo", "hello"),
            path: path.to_string(),
            message: message.to_string(),
            new_content: content.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_commit_with_fresh_version_succeeds() {
        let api = FakeApi::new(Ok("abc123"), Ok("c0ffee"));
        let coordinator = CommitCoordinator::new(api.clone());

        let attempt = coordinator
            .attempt(&request("docs/readme.md", "Update readme", "new"))
            .await;
        assert_eq!(
            attempt.history(),
            &["idle", "fetching", "submitting", "committed"]
        );
        assert_eq!(attempt.into_result().unwrap(), "c0ffee");

        let update = api.last_update.lock().unwrap().clone().unwrap();
        assert_eq!(update.version_tag, "abc123");
        assert_eq!(update.content, "bmV3");
        assert_eq!(update.path, "docs/readme.md");
        assert_eq!(update.message, "Update readme");
        assert_eq!(api.calls(), (1, 1));
    }

    #[tokio::test]
    async fn test_conflict_is_concurrent_modification() {
        let api = FakeApi::new(
            Ok("abc123"),
            Err(RemoteError::Conflict("is at def456 but expected abc123".to_string())),
        );
        let coordinator = CommitCoordinator::new(api.clone());

        let attempt = coordinator.attempt(&request("docs/readme.md", "m", "new")).await;
        assert!(matches!(
            attempt.state(),
            CommitState::Rejected { version_tag } if version_tag == "abc123"
        ));
        assert!(matches!(
            attempt.into_result(),
            Err(AppError::ConcurrentModification(p)) if p == "docs/readme.md"
        ));
        // no automatic retry
        assert_eq!(api.calls(), (1, 1));
    }

    #[tokio::test]
    async fn test_missing_remote_file_skips_write() {
        let api = FakeApi::new(
            Err(RemoteError::NotFound("docs/readme.md".to_string())),
            Ok("never"),
        );
        let coordinator = CommitCoordinator::new(api.clone());

        let attempt = coordinator.attempt(&request("docs/readme.md", "m", "new")).await;
        assert_eq!(attempt.history(), &["idle", "fetching", "failed"]);
        assert!(matches!(attempt.into_result(), Err(AppError::RemoteFileMissing(_))));
        assert_eq!(api.calls(), (1, 0));
    }

    #[tokio::test]
    async fn test_empty_message_or_content_makes_no_remote_call() {
        let api = FakeApi::new(Ok("abc123"), Ok("c0ffee"));
        let coordinator = CommitCoordinator::new(api.clone());

        for bad in [
            request("docs/readme.md", "", "new"),
            request("docs/readme.md", "   ", "new"),
            request("docs/readme.md", "msg", ""),
            request("", "msg", "new"),
        ] {
            let result = coordinator.commit(&bad).await;
            assert!(matches!(result, Err(AppError::InvalidRequest(_))), "{result:?}");
        }

        let mut missing_owner = request("a.md", "m", "c");
        missing_owner.repository.owner.clear();
        assert!(matches!(
            coordinator.commit(&missing_owner).await,
            Err(AppError::InvalidRequest(_))
        ));

        assert_eq!(api.calls(), (0, 0));
    }

    #[tokio::test]
    async fn test_traversal_path_makes_no_remote_call() {
        let api = FakeApi::new(Ok("abc123"), Ok("c0ffee"));
        let coordinator = CommitCoordinator::new(api.clone());

        let result = coordinator.commit(&request("../../etc/passwd", "m", "x")).await;
        assert!(matches!(result, Err(AppError::InvalidPath(_))));
        assert_eq!(api.calls(), (0, 0));
    }

    #[tokio::test]
    async fn test_path_is_normalized_before_remote_calls() {
        let api = FakeApi::new(Ok("abc123"), Ok("c0ffee"));
        let coordinator = CommitCoordinator::new(api.clone());

        let attempt = coordinator.attempt(&request("./docs//readme.md", "m", "x")).await;
        assert_eq!(attempt.path(), "docs/readme.md");
        let update = api.last_update.lock().unwrap().clone().unwrap();
        assert_eq!(update.path, "docs/readme.md");
    }

    #[tokio::test]
    async fn test_transport_failures_keep_message() {
        let api = FakeApi::new(
            Ok("abc123"),
            Err(RemoteError::Transport("GitHub API error (502 Bad Gateway): upstream down".to_string())),
        );
        let coordinator = CommitCoordinator::new(api.clone());

        match coordinator.commit(&request("a.md", "m", "x")).await {
            Err(AppError::Transport(msg)) => {
                assert_eq!(msg, "GitHub API error (502 Bad Gateway): upstream down")
            }
            other => panic!("expected transport error, got {other:?}"),
        }

        let api = FakeApi::new(Err(RemoteError::Transport("Network error: refused".to_string())), Ok("x"));
        let coordinator = CommitCoordinator::new(api.clone());
        let attempt = coordinator.attempt(&request("a.md", "m", "x")).await;
        assert_eq!(attempt.history(), &["idle", "fetching", "failed"]);
        assert!(matches!(attempt.into_result(), Err(AppError::Transport(m)) if m == "Network error: refused"));
        assert_eq!(api.calls(), (1, 0));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!CommitState::Idle.is_terminal());
        assert!(!CommitState::Fetching.is_terminal());
        assert!(!CommitState::Submitting { version_tag: "t".into() }.is_terminal());
        assert!(CommitState::Committed { commit_id: "c".into() }.is_terminal());
        assert!(CommitState::Rejected { version_tag: "t".into() }.is_terminal());
    }
}
