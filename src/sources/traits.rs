//! Source handler trait and metadata

use crate::results::ResultRecord;
use async_trait::async_trait;
use serde::Serialize;

/// Source metadata, reported by `/stats`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceAbout {
    /// Website URL
    pub website: Option<String>,
    /// Whether it uses an official API
    pub use_official_api: bool,
    /// Whether a credential is required for full functionality
    pub require_api_key: bool,
    /// How results are obtained (LLM, HTML, ...)
    pub results: String,
}

impl SourceAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn official_api(mut self, uses: bool) -> Self {
        self.use_official_api = uses;
        self
    }

    pub fn api_key_required(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }

    pub fn results_format(mut self, format: impl Into<String>) -> Self {
        self.results = format.into();
        self
    }
}

/// A pluggable provider of MCP recommendations
///
/// A handler either returns its records (possibly none) or a single error;
/// the orchestrator treats an error as "nothing from this source".
#[async_trait]
pub trait SourceHandler: Send + Sync {
    /// Unique source name
    fn name(&self) -> &str;

    /// Short description of the source
    fn about(&self) -> SourceAbout {
        SourceAbout::default()
    }

    /// Recommend MCPs for a use case description
    async fn search(&self, use_case_description: &str) -> anyhow::Result<Vec<ResultRecord>>;
}
