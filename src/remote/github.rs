//! GitHub REST contents API.
//!
//! - GET  /repos/{owner}/{repo}/contents/{path} → current blob `sha`
//! - PUT  /repos/{owner}/{repo}/contents/{path} { message, content, sha }
//!   GitHub refuses the PUT with 409 when `sha` is no longer the file's blob.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::RemoteConfig;
use crate::models::{RemoteFileVersion, RepositoryRef};
use crate::remote::error::{RemoteError, RemoteResult};
use crate::remote::{ContentApi, ContentUpdate};

const USER_AGENT: &str = concat!("repo-workbench/", env!("CARGO_PKG_VERSION"));

pub struct GitHubContentApi {
    client: Client,
    api_url: Url,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentMetadata {
    sha: String,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    message: &'a str,
    content: &'a str,
    sha: &'a str,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

impl GitHubContentApi {
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| RemoteError::Transport(format!("Invalid API URL {}: {}", config.api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(RemoteError::Transport(format!("Invalid API URL {}", config.api_url)));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            token: config.token.clone(),
        })
    }

    fn contents_url(&self, repo: &RepositoryRef, path: &str) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "contents"])
                .extend(path.split('/'));
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }
}

#[async_trait]
impl ContentApi for GitHubContentApi {
    async fn fetch_version(&self, repo: &RepositoryRef, path: &str) -> RemoteResult<RemoteFileVersion> {
        let url = self.contents_url(repo, path);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Transport(format!("Malformed response from GitHub: {}", e)))?;

        // A directory comes back as an array of entries
        if body.is_array() {
            return Err(RemoteError::NotFound(path.to_string()));
        }

        let metadata: ContentMetadata = serde_json::from_value(body)
            .map_err(|e| RemoteError::Transport(format!("Malformed response from GitHub: {}", e)))?;
        if metadata.kind != "file" {
            return Err(RemoteError::NotFound(path.to_string()));
        }

        Ok(RemoteFileVersion {
            path: path.to_string(),
            version_tag: metadata.sha,
        })
    }

    async fn put_content(&self, update: &ContentUpdate) -> RemoteResult<String> {
        let url = self.contents_url(&update.repository, &update.path);
        let body = UpdateBody {
            message: &update.message,
            content: &update.content,
            sha: &update.version_tag,
        };

        let response = self
            .request(Method::PUT, url)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == StatusCode::CONFLICT || status == StatusCode::PRECONDITION_FAILED {
            return Err(RemoteError::Conflict(error_message(response).await));
        }
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        let updated: UpdateResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Transport(format!("Malformed response from GitHub: {}", e)))?;
        Ok(updated.commit.sha)
    }
}

fn network_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Transport(format!("Request to GitHub timed out: {}", e))
    } else {
        RemoteError::Transport(format!("Network error: {}", e))
    }
}

async fn status_error(status: StatusCode, response: Response) -> RemoteError {
    let message = error_message(response).await;
    tracing::warn!("GitHub API returned {}: {}", status, message);
    RemoteError::Transport(format!("GitHub API error ({}): {}", status, message))
}

/// The `message` field of a GitHub error body, or the raw body otherwise.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Could not read GitHub error body ({}): {}", status, e);
            String::new()
        }
    };

    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.to_string())
}
