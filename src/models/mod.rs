//! Data transfer objects (DTOs) for API requests and responses.
//!
//! These structs are serialized to JSON for frontend consumption.
//! - `tree`: RepositoryRef, FileNode, TreeResponse, FileContentResponse
//! - `commit`: CommitRequest, CommitBody, RemoteFileVersion, CommitReceipt
//! - `filesystem`: RepositorySummary, RepositoryListing, clone request/response

pub mod commit;
pub mod filesystem;
pub mod tree;

pub use commit::*;
pub use filesystem::*;
pub use tree::*;
