//! Recursive directory walk producing the repository's `FileNode` tree.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{FileNode, RepositoryRef};
use crate::workspace::Workspace;

/// Clone metadata; never part of a listing.
const GIT_DIR: &str = ".git";

impl Workspace {
    pub fn list_tree(&self, repo: &RepositoryRef) -> Result<Vec<FileNode>> {
        let repo_path = self.resolve_repository(repo)?;
        build_tree(&repo_path)
    }
}

/// Recursively indexes `repository_path` into an ordered tree.
///
/// Only failing to read the root itself is an error. Entries below it that
/// cannot be read are logged and left out, and symbolic links are never
/// followed.
pub fn build_tree(repository_path: &Path) -> Result<Vec<FileNode>> {
    let read_dir = fs::read_dir(repository_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            AppError::RepoNotFound(repository_path.to_string_lossy().to_string())
        }
        _ => AppError::Io(e),
    })?;

    let start = std::time::Instant::now();
    let nodes = collect_entries(read_dir, "");
    tracing::debug!(
        "Indexed {} in {:?}",
        repository_path.display(),
        start.elapsed()
    );
    Ok(nodes)
}

fn collect_entries(read_dir: fs::ReadDir, base_path: &str) -> Vec<FileNode> {
    let mut nodes = Vec::new();

    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under '{}': {}", base_path, e);
                continue;
            }
        };

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!("Skipping non UTF-8 name {:?} under '{}'", raw, base_path);
                continue;
            }
        };

        // file_type() does not follow symlinks
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let path = if base_path.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", base_path, name)
        };

        if file_type.is_symlink() {
            tracing::debug!("Skipping symlink {}", path);
            continue;
        }

        if file_type.is_dir() {
            if name == GIT_DIR {
                continue;
            }
            match fs::read_dir(entry.path()) {
                Ok(children) => {
                    let children = collect_entries(children, &path);
                    nodes.push(FileNode::directory(name, path, children));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable directory {}: {}", path, e);
                }
            }
        } else if file_type.is_file() {
            nodes.push(FileNode::file(name, path));
        } else {
            tracing::debug!("Skipping special file {}", path);
        }
    }

    // Sort: directories first, then case-insensitive name
    nodes.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    });

    nodes
}
