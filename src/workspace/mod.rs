//! Local workspace holding cloned repositories under `root/owner/name`.
//!
//! - `resolve`: (owner, repo, relative path) → safe absolute path
//! - `tree`: recursive directory indexer producing `FileNode` trees
//! - `content`: raw byte reads/writes for single files
//! - `catalog`: listing and cloning repositories

pub mod catalog;
pub mod content;
pub mod resolve;
pub mod tree;

use std::path::PathBuf;

pub use catalog::parse_github_url;
pub use resolve::normalize_relative;
pub use tree::build_tree;

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}
