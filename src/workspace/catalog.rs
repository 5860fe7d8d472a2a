//! Workspace catalog: which repositories are cloned, and cloning new ones.

use std::fs;
use std::path::PathBuf;

use git2::Repository;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{RepositoryRef, RepositorySummary};
use crate::workspace::Workspace;
use crate::workspace::resolve::validate_segment;

impl Workspace {
    /// Every `root/owner/name` directory, sorted by owner then name.
    pub fn list_repositories(&self) -> Result<Vec<RepositorySummary>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut repositories = Vec::new();
        for owner in fs::read_dir(&self.root)? {
            let owner = owner?;
            if !owner.file_type().is_ok_and(|ft| ft.is_dir()) {
                continue;
            }
            let owner_name = owner.file_name().to_string_lossy().to_string();

            let repos = match fs::read_dir(owner.path()) {
                Ok(repos) => repos,
                Err(e) => {
                    tracing::warn!("Skipping owner directory {}: {}", owner_name, e);
                    continue;
                }
            };

            for repo in repos.flatten() {
                if repo.file_type().is_ok_and(|ft| ft.is_dir()) {
                    repositories.push(RepositorySummary {
                        owner: owner_name.clone(),
                        repo: repo.file_name().to_string_lossy().to_string(),
                    });
                }
            }
        }

        repositories.sort_by(|a, b| a.owner.cmp(&b.owner).then_with(|| a.repo.cmp(&b.repo)));
        Ok(repositories)
    }

    /// Clones `url` into `root/owner/name`. Blocks for the whole transfer.
    pub fn clone_repository(&self, url: &str, repo: &RepositoryRef) -> Result<PathBuf> {
        validate_segment("owner", &repo.owner)?;
        validate_segment("repository name", &repo.name)?;

        let target = self.root.join(&repo.owner).join(&repo.name);
        if target.exists() {
            return Err(AppError::InvalidRequest("Repository already cloned.".to_string()));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!("Cloning {} into {}", url, target.display());
        let start = std::time::Instant::now();
        Repository::clone(url, &target)?;
        tracing::info!("Cloned {} in {:?}", repo, start.elapsed());

        Ok(target)
    }
}

/// Extracts owner and repository name from `https://github.com/owner/name[.git]`.
pub fn parse_github_url(repo_url: &str) -> Result<RepositoryRef> {
    let repo_url = repo_url.trim();
    if repo_url.is_empty() {
        return Err(AppError::InvalidRequest("Repository URL is required".to_string()));
    }

    let invalid = || AppError::InvalidRequest("Invalid GitHub repository URL.".to_string());

    let url = Url::parse(repo_url).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "https" | "http") || url.host_str() != Some("github.com") {
        return Err(invalid());
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let [owner, name] = segments.as_slice() else {
        return Err(invalid());
    };

    let name = name.strip_suffix(".git").unwrap_or(*name);
    let repo = RepositoryRef::new(*owner, name);
    validate_segment("owner", &repo.owner).map_err(|_| invalid())?;
    validate_segment("repository name", &repo.name).map_err(|_| invalid())?;
    Ok(repo)
}
