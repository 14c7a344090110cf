//! HTTP networking module
//!
//! Provides the HTTP client and the GitHub API client used by sources.

mod client;
mod github;
mod request;

pub use client::HttpClient;
pub use github::{parse_repo_id, GitHubClient, RepositoryHost};
pub use request::{HttpMethod, HttpRequest, HttpResponse};
