//! Byte-level reads and writes of single files inside a cloned repository.

use std::fs;
use std::io::ErrorKind;

use crate::error::{AppError, Result};
use crate::models::RepositoryRef;
use crate::workspace::Workspace;

impl Workspace {
    /// Raw bytes of one file in a cloned repository.
    pub fn read_file(&self, repo: &RepositoryRef, relative_path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(repo, relative_path)?;

        let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::PathNotFound(relative_path.to_string()),
            _ => AppError::Io(e),
        })?;
        if metadata.is_dir() {
            return Err(AppError::InvalidPath(format!("{} is not a file", relative_path)));
        }

        Ok(fs::read(&path)?)
    }

    /// File content decoded as UTF-8 text.
    pub fn read_text(&self, repo: &RepositoryRef, relative_path: &str) -> Result<String> {
        let bytes = self.read_file(repo, relative_path)?;
        String::from_utf8(bytes).map_err(|_| {
            AppError::InvalidRequest(format!("{} is not a UTF-8 text file", relative_path))
        })
    }

    /// Replaces the content of one file. Its parent directory must already exist.
    pub fn write_file(&self, repo: &RepositoryRef, relative_path: &str, content: &[u8]) -> Result<()> {
        let path = self.resolve(repo, relative_path)?;

        if path.is_dir() {
            return Err(AppError::InvalidPath(format!("{} is not a file", relative_path)));
        }
        if !path.parent().is_some_and(|p| p.is_dir()) {
            return Err(AppError::PathNotFound(relative_path.to_string()));
        }

        fs::write(&path, content)?;
        tracing::debug!("Wrote {} bytes to {}/{}", content.len(), repo, relative_path);
        Ok(())
    }
}
