//! Curated-list source
//!
//! Matches a use case against community-maintained MCP server lists with a
//! single structured LLM call, then adds GitHub star counts.

use super::traits::*;
use crate::cache::{CachedDocument, DocumentCache, StarCache};
use crate::llm::{parse_structured, LlmBackend, LlmRequest, OutputSchema};
use crate::markdown::{extract_section, headings};
use crate::network::{parse_repo_id, RepositoryHost};
use crate::results::ResultRecord;
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Schema name of the matcher's answer
pub const CANDIDATES_SCHEMA: &str = "MCPCandidates";

const PROMPT_HEADER: &str = "\
Analyze a given use case and the curated lists of Model Context Protocols (MCPs) below to determine the MCPs best suited to the user's use case.
Provide expert advice and recommendations based on your findings.

# Steps

1. **Understand the Use Case**: Read the user's use case and its requirements carefully.
2. **List Functionalities**: Work out the functionalities the use case needs.
3. **Review MCP Lists**: Examine the curated lists below, taken from GitHub README files, for potential matches.
4. **Matching Process**:
   - Compare the functionalities from step 2 with the features of each MCP.
   - Consider compatibility, reliability and community support.
5. **Advice and Recommendation**:
   - Recommend 3 - 6 MCPs best suited for the use case, best match first.
   - Give the reasoning behind each recommendation.
   - List the functions each MCP provides to the use case.
   - Use the MCP's repository URL from the lists as its url.

# Notes

- Focus on clear, directed recommendations rather than open-ended alternatives.
";

/// One MCP proposed by the matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpCandidate {
    pub name: String,
    pub description: String,
    pub url: String,
    pub corresponding_functions: Vec<String>,
    pub reasoning: String,
}

impl McpCandidate {
    fn into_record(self, source: &str) -> ResultRecord {
        let mut record = ResultRecord::new(self.name, self.url)
            .with_description(self.description)
            .with_functions(self.corresponding_functions)
            .with_reasoning(self.reasoning);
        record.source_name = source.to_string();
        record
    }
}

/// The matcher's answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpCandidates {
    #[serde(rename = "MCP_candidates")]
    pub candidates: Vec<McpCandidate>,
}

/// Structured-output schema for [`McpCandidates`]
pub fn candidates_schema() -> OutputSchema {
    OutputSchema::new(
        CANDIDATES_SCHEMA,
        serde_json::json!({
            "type": "object",
            "properties": {
                "MCP_candidates": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "description": {"type": "string"},
                            "url": {"type": "string"},
                            "corresponding_functions": {
                                "type": "array",
                                "items": {"type": "string"}
                            },
                            "reasoning": {"type": "string"}
                        },
                        "required": ["name", "description", "url", "corresponding_functions", "reasoning"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["MCP_candidates"],
            "additionalProperties": false
        }),
    )
}

/// Narrow a document to its configured section
fn narrow(document: &CachedDocument) -> String {
    match &document.section {
        Some(keyword) => {
            let section = extract_section(&document.text, keyword);
            if section.is_empty() {
                warn!(
                    "No '{}' section in {}; headings: {:?}",
                    keyword,
                    document.repo,
                    headings(&document.text)
                );
            }
            section
        }
        None => document.text.clone(),
    }
}

/// Build the matcher's system instruction from the curated documents
pub fn build_system_prompt(documents: &[CachedDocument]) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    for (i, document) in documents.iter().enumerate() {
        prompt.push_str(&format!(
            "\n# Curated MCP List {} ({})\n\n{}\n",
            i + 1,
            document.repo,
            narrow(document)
        ));
    }
    prompt
}

/// LLM matcher over cached curated lists, with optional star enrichment
pub struct CuratedListSource {
    name: String,
    llm: Arc<dyn LlmBackend>,
    model: String,
    documents: DocumentCache,
    host: Option<Arc<dyn RepositoryHost>>,
    stars: StarCache,
}

impl CuratedListSource {
    pub fn new(
        name: impl Into<String>,
        llm: Arc<dyn LlmBackend>,
        model: impl Into<String>,
        documents: DocumentCache,
    ) -> Self {
        Self {
            name: name.into(),
            llm,
            model: model.into(),
            documents,
            host: None,
            stars: StarCache::default(),
        }
    }

    /// Enable cache refreshes and star counts
    pub fn with_host(mut self, host: Arc<dyn RepositoryHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_star_cache(mut self, stars: StarCache) -> Self {
        self.stars = stars;
        self
    }

    async fn enrich(&self, candidates: Vec<McpCandidate>) -> Vec<ResultRecord> {
        let records = candidates
            .into_iter()
            .map(|candidate| candidate.into_record(&self.name));

        match self.host.as_deref() {
            Some(host) => join_all(records.map(|record| self.add_stars(record, host))).await,
            None => records.collect(),
        }
    }

    async fn add_stars(&self, mut record: ResultRecord, host: &dyn RepositoryHost) -> ResultRecord {
        let repo = match parse_repo_id(&record.url) {
            Some(repo) => repo,
            None => {
                debug!("No GitHub repository in {}, skipping stars", record.url);
                return record;
            }
        };

        match self.stars.get_or_fetch(&repo, host).await {
            Ok(stars) => record.stars = Some(stars),
            Err(e) => warn!("Failed to get stars for {}: {:#}", repo, e),
        }
        record
    }
}

#[async_trait]
impl SourceHandler for CuratedListSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn about(&self) -> SourceAbout {
        SourceAbout::new()
            .website("https://github.com")
            .official_api(true)
            .api_key_required(true)
            .results_format("LLM")
    }

    async fn search(&self, use_case_description: &str) -> Result<Vec<ResultRecord>> {
        if use_case_description.trim().is_empty() {
            debug!("Empty use case description, nothing to match");
            return Ok(vec![]);
        }

        let documents = self.documents.load(self.host.as_deref()).await?;
        let refreshed = documents.iter().filter(|d| d.refreshed).count();
        if refreshed > 0 {
            info!("Refreshed {} of {} curated lists", refreshed, documents.len());
        }
        let request = LlmRequest::new(
            self.model.clone(),
            build_system_prompt(&documents),
            format!("Use case description: {}", use_case_description),
            candidates_schema(),
        );

        info!("Searching over curated lists of MCPs/APIs...");
        let answer: McpCandidates = parse_structured(self.llm.as_ref(), &request).await?;

        let proposed = answer.candidates.len();
        let candidates: Vec<McpCandidate> = answer
            .candidates
            .into_iter()
            .filter(|c| !c.url.trim().is_empty())
            .collect();
        if candidates.len() < proposed {
            debug!(
                "Dropped {} candidates without a url",
                proposed - candidates.len()
            );
        }

        Ok(self.enrich(candidates).await)
    }
}
