//! Runtime configuration assembled from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding `owner/name` clones.
    pub workspace_root: PathBuf,
    pub remote: RemoteConfig,
}

#[derive(Clone)]
pub struct RemoteConfig {
    pub api_url: String,
    /// Pre-provisioned bearer credential.
    pub token: Option<String>,
    /// Applied to each remote call separately.
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Keep the token out of logs
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let config = RemoteConfig {
            token: Some("ghp_secret".to_string()),
            ..RemoteConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("ghp_secret"));
        assert!(printed.contains("<redacted>"));
    }
}
