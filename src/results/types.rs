//! Result type definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A recommended MCP server
///
/// `url` identifies the candidate; every other field may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub corresponding_functions: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    /// Popularity signal, when the hosting API was reachable
    #[serde(default)]
    pub stars: Option<u64>,
    /// Name of the source that produced the record
    #[serde(default)]
    pub source_name: String,
}

impl ResultRecord {
    /// Create a new record
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            url: url.into(),
            corresponding_functions: vec![],
            reasoning: String::new(),
            stars: None,
            source_name: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_functions(mut self, functions: Vec<String>) -> Self {
        self.corresponding_functions = functions;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stars = Some(stars);
        self
    }

    /// Whether the record carries a usable identifier
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Why a source produced nothing this round
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "message")]
pub enum SourceFailure {
    #[error("{0}")]
    Failed(String),
    #[error("source panicked: {0}")]
    Panicked(String),
}

/// Outcome of one source for one search
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    /// Source name
    pub source: String,
    /// Time spent in the source
    pub elapsed: Duration,
    /// Records or the failure
    pub result: Result<Vec<ResultRecord>, SourceFailure>,
}

impl SourceOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Number of records contributed
    pub fn result_count(&self) -> usize {
        self.result.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Source response timing information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    /// Source name
    pub source: String,
    /// Response time in milliseconds
    pub time_ms: u64,
    /// Number of results returned
    pub result_count: usize,
}

/// A source that failed during a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresponsiveSource {
    pub name: String,
    pub error: SourceFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_with_missing_fields() {
        let record: ResultRecord =
            serde_json::from_str(r#"{"url": "https://github.com/org/tool"}"#).unwrap();
        assert_eq!(record.url, "https://github.com/org/tool");
        assert!(record.name.is_empty());
        assert!(record.corresponding_functions.is_empty());
        assert_eq!(record.stars, None);
    }

    #[test]
    fn test_record_requires_url() {
        let result: Result<ResultRecord, _> = serde_json::from_str(r#"{"name": "Tool"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_serializes_mapping_keys() {
        let record = ResultRecord::new("Tool", "https://github.com/org/tool")
            .with_functions(vec!["send_message".to_string()])
            .with_stars(5);
        let value = serde_json::to_value(&record).unwrap();
        for key in ["name", "description", "url", "corresponding_functions", "reasoning", "stars", "source_name"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["stars"], 5);
    }

    #[test]
    fn test_blank_url_is_not_usable() {
        assert!(!ResultRecord::new("Tool", "").has_url());
        assert!(!ResultRecord::new("Tool", "   ").has_url());
        assert!(ResultRecord::new("Tool", "https://x.dev").has_url());
    }

    #[test]
    fn test_failure_serialization() {
        let value = serde_json::to_value(SourceFailure::Failed("boom".to_string())).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "failed", "message": "boom"}));
    }
}
