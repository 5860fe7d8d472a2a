//! Path resolution inside the workspace.
//!
//! Normalization is lexical. The only filesystem lookups are the repository
//! existence check and a symlink check on each existing path segment, so a
//! link committed into a repository cannot point reads or writes elsewhere.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::RepositoryRef;
use crate::workspace::Workspace;

impl Workspace {
    /// Absolute directory of a cloned repository.
    pub fn resolve_repository(&self, repo: &RepositoryRef) -> Result<PathBuf> {
        validate_segment("owner", &repo.owner)?;
        validate_segment("repository name", &repo.name)?;

        let path = self.root.join(&repo.owner).join(&repo.name);
        if !path.is_dir() {
            return Err(AppError::RepoNotFound(repo.to_string()));
        }
        Ok(path)
    }

    /// Absolute location of `relative_path` inside a cloned repository.
    ///
    /// The file itself need not exist; callers decide what a missing file means.
    pub fn resolve(&self, repo: &RepositoryRef, relative_path: &str) -> Result<PathBuf> {
        validate_segment("owner", &repo.owner)?;
        validate_segment("repository name", &repo.name)?;
        let relative = normalize_relative(relative_path)?;

        let mut path = self.resolve_repository(repo)?;
        for segment in relative.split('/') {
            path.push(segment);
            if is_symlink(&path)? {
                return Err(AppError::InvalidPath(format!(
                    "{} passes through a symbolic link",
                    relative_path
                )));
            }
        }
        Ok(path)
    }
}

/// Missing entries are not links; whoever uses the path reports them.
fn is_symlink(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(metadata) => Ok(metadata.file_type().is_symlink()),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Lexically normalizes a repository-relative path into `a/b/c` form.
///
/// `.` segments and empty segments are dropped, `..` removes the previous
/// segment. Absolute paths and any `..` that would climb above the
/// repository root are rejected.
pub fn normalize_relative(path: &str) -> Result<String> {
    if path.trim().is_empty() {
        return Err(AppError::InvalidRequest("File path is required".to_string()));
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return Err(AppError::InvalidPath(format!("{} must be relative", path)));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                if segments.pop().is_none() {
                    return Err(AppError::InvalidPath(format!(
                        "{} escapes the repository",
                        path
                    )));
                }
            }
            s if s.contains('\0') => {
                return Err(AppError::InvalidPath(path.to_string()));
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(AppError::InvalidPath(format!("{} does not name a file", path)));
    }

    Ok(segments.join("/"))
}

/// Owner and repository names must be exactly one ordinary path segment.
pub(crate) fn validate_segment(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidRequest(format!("Repository {} is required", label)));
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(AppError::InvalidPath(format!("Invalid {}: {}", label, value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace_with_repo() -> (TempDir, Workspace, RepositoryRef) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("octo/hello")).unwrap();
        let ws = Workspace::new(dir.path());
        (dir, ws, RepositoryRef::new("octo", "hello"))
    }

    #[test]
    fn test_normalize_collapses_dot_segments() {
        assert_eq!(normalize_relative("docs/./readme.md").unwrap(), "docs/readme.md");
        assert_eq!(normalize_relative("src/../README.md").unwrap(), "README.md");
        assert_eq!(normalize_relative("a//b/").unwrap(), "a/b");
    }

    #[test]
    fn test_normalize_rejects_traversal() {
        assert!(matches!(normalize_relative("../secret"), Err(AppError::InvalidPath(_))));
        assert!(matches!(
            normalize_relative("docs/../../other/file"),
            Err(AppError::InvalidPath(_))
        ));
        assert!(matches!(normalize_relative("..\\..\\etc"), Err(AppError::InvalidPath(_))));
        assert!(matches!(normalize_relative("/etc/passwd"), Err(AppError::InvalidPath(_))));
        assert!(matches!(normalize_relative("a/.."), Err(AppError::InvalidPath(_))));
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_relative(""), Err(AppError::InvalidRequest(_))));
        assert!(matches!(normalize_relative("   "), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_resolve_stays_inside_repository() {
        let (dir, ws, repo) = workspace_with_repo();
        let path = ws.resolve(&repo, "src/../docs/readme.md").unwrap();
        assert_eq!(path, dir.path().join("octo/hello/docs/readme.md"));
    }

    #[test]
    fn test_resolve_missing_repository() {
        let (_dir, ws, _) = workspace_with_repo();
        let missing = RepositoryRef::new("octo", "nope");
        assert!(matches!(ws.resolve_repository(&missing), Err(AppError::RepoNotFound(_))));
        assert!(matches!(ws.resolve(&missing, "a.txt"), Err(AppError::RepoNotFound(_))));
    }

    #[test]
    fn test_resolve_rejects_bad_owner_and_name() {
        let (_dir, ws, _) = workspace_with_repo();
        assert!(matches!(
            ws.resolve(&RepositoryRef::new("", "hello"), "a.txt"),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            ws.resolve(&RepositoryRef::new("octo", ""), "a.txt"),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            ws.resolve(&RepositoryRef::new("..", "hello"), "a.txt"),
            Err(AppError::InvalidPath(_))
        ));
        assert!(matches!(
            ws.resolve_repository(&RepositoryRef::new("octo/hello", "x")),
            Err(AppError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_invalid_path_reported_before_missing_repository() {
        let (_dir, ws, _) = workspace_with_repo();
        let missing = RepositoryRef::new("octo", "nope");
        assert!(matches!(ws.resolve(&missing, "../../x"), Err(AppError::InvalidPath(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlinked_segments() {
        use std::os::unix::fs::symlink;

        let (dir, ws, repo) = workspace_with_repo();
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("secret.txt"), "secret").unwrap();
        symlink(outside.join("secret.txt"), dir.path().join("octo/hello/evil")).unwrap();
        symlink(&outside, dir.path().join("octo/hello/out")).unwrap();

        assert!(matches!(ws.resolve(&repo, "evil"), Err(AppError::InvalidPath(_))));
        assert!(matches!(ws.resolve(&repo, "out/secret.txt"), Err(AppError::InvalidPath(_))));
        assert!(matches!(ws.resolve(&repo, "out/new.txt"), Err(AppError::InvalidPath(_))));

        // Plain entries and not-yet-existing files still resolve
        fs::write(dir.path().join("octo/hello/plain.txt"), "ok").unwrap();
        assert!(ws.resolve(&repo, "plain.txt").is_ok());
        assert!(ws.resolve(&repo, "docs/new.md").is_ok());
    }
}
