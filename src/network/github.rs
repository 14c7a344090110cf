//! GitHub REST API access for README documents and star counts

use super::client::HttpClient;
use super::request::{HttpRequest, HttpResponse};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static REPO_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)")
        .expect("valid repository URL regex")
});

/// A repository hosting service
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Raw README text of `owner/repo`
    async fn readme(&self, repo: &str) -> Result<String>;

    /// Star count of `owner/repo`
    async fn stars(&self, repo: &str) -> Result<u64>;
}

/// Extract `owner/repo` from a GitHub URL
pub fn parse_repo_id(url: &str) -> Option<String> {
    let caps = REPO_URL_RE.captures(url.trim())?;
    let owner = &caps[1];
    let repo = caps[2].trim_end_matches(".git");
    if repo.is_empty() {
        return None;
    }
    Some(format!("{}/{}", owner, repo))
}

#[derive(Debug, Deserialize)]
struct ReadmePayload {
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    stargazers_count: u64,
}

/// Token-authenticated GitHub API client
pub struct GitHubClient {
    client: HttpClient,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(client: HttpClient, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    async fn get(&self, path: &str) -> Result<HttpResponse> {
        let request = HttpRequest::get(format!("{}{}", self.api_url, path))
            .bearer(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        let response = self.client.execute(request).await?;
        if response.is_rate_limited() {
            return Err(anyhow!("GitHub API rate limit exceeded"));
        }
        if !response.is_success() {
            return Err(anyhow!("GitHub API error {} for {}", response.status, path));
        }
        Ok(response)
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn readme(&self, repo: &str) -> Result<String> {
        let response = self.get(&format!("/repos/{}/readme", repo)).await?;
        let payload: ReadmePayload = response
            .json()
            .with_context(|| format!("Invalid README payload for {}", repo))?;

        if !payload.encoding.is_empty() && payload.encoding != "base64" {
            return Err(anyhow!(
                "Unsupported README encoding '{}' for {}",
                payload.encoding,
                repo
            ));
        }

        let cleaned: String = payload
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(cleaned)
            .with_context(|| format!("README of {} is not valid base64", repo))?;
        Ok(String::from_utf8(bytes)?)
    }

    async fn stars(&self, repo: &str) -> Result<u64> {
        let response = self.get(&format!("/repos/{}", repo)).await?;
        let payload: RepositoryPayload = response
            .json()
            .with_context(|| format!("Invalid repository payload for {}", repo))?;
        Ok(payload.stargazers_count)
    }
}
