//! Repository Workbench - clone, browse, edit and commit GitHub repositories
//!
//! # Usage
//! ```bash
//! repo-workbench                                   # Serve ./cloned-repos on port 3001
//! repo-workbench --workspace-root /srv/repos -p 8080
//! GITHUB_TOKEN=ghp_... repo-workbench              # Enable commits to GitHub
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repo_workbench::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use repo_workbench::{AppConfig, AppState, RemoteConfig};

/// Repository Workbench - edit GitHub repositories from your browser
#[derive(Parser)]
#[command(name = "repo-workbench")]
#[command(about = "Clone, browse, edit and commit GitHub repositories", long_about = None)]
struct Cli {
    /// Directory holding cloned repositories as owner/name
    #[arg(long, env = "WORKBENCH_ROOT", default_value = "./cloned-repos")]
    workspace_root: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    github_api_url: String,

    /// Bearer token used for GitHub API calls
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Timeout for each GitHub API call, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    remote_timeout_secs: u64,
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig {
            workspace_root: self.workspace_root.clone(),
            remote: RemoteConfig {
                api_url: self.github_api_url.clone(),
                token: self.github_token.clone().filter(|t| !t.trim().is_empty()),
                timeout: Duration::from_secs(self.remote_timeout_secs),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "repo_workbench=info,tower_http=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.config();
    tracing::debug!("Configuration: {:?}", config);
    if config.remote.token.is_none() {
        tracing::warn!("No GitHub token configured; commits will be rejected by GitHub");
    }

    std::fs::create_dir_all(&config.workspace_root)?;
    let state = AppState::from_config(&config)?;
    let app = repo_workbench::app(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    let canonical_root = std::fs::canonicalize(&config.workspace_root)
        .unwrap_or_else(|_| config.workspace_root.clone());

    println!();
    println!("  Repository Workbench");
    println!();
    println!("  Workspace: {}", canonical_root.display());
    println!("  Server:    http://{}", addr);
    println!("  GitHub:    {}", config.remote.api_url);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
