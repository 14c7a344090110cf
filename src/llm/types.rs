//! LLM backend trait and request types

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// JSON schema the model's answer must follow
#[derive(Debug, Clone, Serialize)]
pub struct OutputSchema {
    /// Schema name reported to the backend
    pub name: String,
    /// JSON schema document
    pub schema: serde_json::Value,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// One structured-output request: system instruction plus user message
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub schema: OutputSchema,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
        schema: OutputSchema,
    ) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            schema,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// LLM call failures
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,
    #[error("LLM request failed: {0}")]
    Transport(String),
    #[error("LLM API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("LLM refused the request: {0}")]
    Refusal(String),
    #[error("Malformed LLM response: {0}")]
    Malformed(String),
}

/// A language model able to answer with JSON matching a schema
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Run the request and return the parsed JSON answer
    async fn complete(&self, request: &LlmRequest) -> Result<serde_json::Value, LlmError>;
}

/// Run a request and deserialize the answer into `T`
pub async fn parse_structured<T: DeserializeOwned>(
    llm: &dyn LlmBackend,
    request: &LlmRequest,
) -> Result<T, LlmError> {
    let value = llm.complete(request).await?;
    serde_json::from_value(value).map_err(|e| LlmError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct Canned(serde_json::Value);

    #[async_trait]
    impl LlmBackend for Canned {
        async fn complete(&self, _request: &LlmRequest) -> Result<serde_json::Value, LlmError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug, Deserialize)]
    struct Answer {
        value: u32,
    }

    fn request() -> LlmRequest {
        LlmRequest::new(
            "model",
            "system",
            "user",
            OutputSchema::new("answer", serde_json::json!({"type": "object"})),
        )
    }

    #[tokio::test]
    async fn test_parse_structured() {
        let llm = Canned(serde_json::json!({"value": 7}));
        let answer: Answer = parse_structured(&llm, &request()).await.unwrap();
        assert_eq!(answer.value, 7);
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_malformed() {
        let llm = Canned(serde_json::json!({"other": "x"}));
        let result: Result<Answer, _> = parse_structured(&llm, &request()).await;
        assert!(matches!(result, Err(LlmError::Malformed(_))));
    }
}
