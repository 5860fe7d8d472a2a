//! Repository workbench - clone GitHub repositories locally, browse and edit
//! their files, and push single-file edits back as commits.
//!
//! - `workspace`: on-disk clones (path resolution, tree indexing, file I/O)
//! - `remote`: GitHub contents API and the optimistic-concurrency commit
//! - `routes`: JSON HTTP API over both

pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod routes;
pub mod workspace;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{AppConfig, RemoteConfig};
pub use error::{AppError, Result};
pub use routes::AppState;

/// The full HTTP application with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
