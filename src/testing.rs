//! Test doubles shared by unit tests

use crate::llm::{LlmBackend, LlmError, LlmRequest};
use crate::network::RepositoryHost;
use crate::results::ResultRecord;
use crate::sources::SourceHandler;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Repository host answering from fixed maps; unknown repos fail
#[derive(Default)]
pub struct FakeHost {
    readmes: HashMap<String, String>,
    stars: HashMap<String, u64>,
    readme_calls: AtomicUsize,
    star_calls: AtomicUsize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readme(mut self, repo: &str, text: &str) -> Self {
        self.readmes.insert(repo.to_string(), text.to_string());
        self
    }

    pub fn with_stars(mut self, repo: &str, stars: u64) -> Self {
        self.stars.insert(repo.to_string(), stars);
        self
    }

    pub fn readme_calls(&self) -> usize {
        self.readme_calls.load(Ordering::SeqCst)
    }

    pub fn star_calls(&self) -> usize {
        self.star_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryHost for FakeHost {
    async fn readme(&self, repo: &str) -> Result<String> {
        self.readme_calls.fetch_add(1, Ordering::SeqCst);
        self.readmes
            .get(repo)
            .cloned()
            .ok_or_else(|| anyhow!("no README for {}", repo))
    }

    async fn stars(&self, repo: &str) -> Result<u64> {
        self.star_calls.fetch_add(1, Ordering::SeqCst);
        self.stars
            .get(repo)
            .copied()
            .ok_or_else(|| anyhow!("no repository {}", repo))
    }
}

/// LLM answering every request with the same value, recording requests
pub struct StubLlm {
    answer: std::result::Result<serde_json::Value, String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl StubLlm {
    pub fn answering(value: serde_json::Value) -> Self {
        Self {
            answer: Ok(value),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmBackend for StubLlm {
    async fn complete(&self, request: &LlmRequest) -> std::result::Result<serde_json::Value, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.answer {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(LlmError::Transport(message.clone())),
        }
    }
}

/// LLM whose answer depends on the schema name
pub struct RoutingLlm {
    answers: HashMap<String, serde_json::Value>,
}

impl RoutingLlm {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
        }
    }

    pub fn route(mut self, schema: &str, value: serde_json::Value) -> Self {
        self.answers.insert(schema.to_string(), value);
        self
    }
}

#[async_trait]
impl LlmBackend for RoutingLlm {
    async fn complete(&self, request: &LlmRequest) -> std::result::Result<serde_json::Value, LlmError> {
        self.answers
            .get(&request.schema.name)
            .cloned()
            .ok_or(LlmError::MissingApiKey)
    }
}

/// Source returning fixed records (or failing) after an optional delay
pub struct StaticSource {
    name: String,
    outcome: std::result::Result<Vec<ResultRecord>, String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn succeeding(name: &str, records: Vec<ResultRecord>) -> Self {
        Self {
            name: name.to_string(),
            outcome: Ok(records),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            outcome: Err(message.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceHandler for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, _use_case_description: &str) -> Result<Vec<ResultRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            Ok(records) => Ok(records.clone()),
            Err(message) => Err(anyhow!("{}", message)),
        }
    }
}

/// Record with a name and URL derived from `tag`
pub fn record(tag: &str) -> ResultRecord {
    ResultRecord::new(tag, format!("https://github.com/example/{}", tag))
}
