//! OpenAI-compatible chat completions backend

use super::types::{LlmBackend, LlmError, LlmRequest};
use crate::config::LlmSettings;
use crate::network::{HttpClient, HttpRequest};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    refusal: Option<String>,
}

/// Chat completions client using `json_schema` structured outputs
pub struct OpenAiClient {
    client: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(client: HttpClient, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(client: HttpClient, settings: &LlmSettings) -> Self {
        Self::new(client, settings.api_key.clone(), settings.base_url.clone())
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn payload(request: &LlmRequest) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "model": request.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema.name,
                    "strict": true,
                    "schema": request.schema.schema,
                }
            }
        });
        if let Some(temperature) = request.temperature {
            payload["temperature"] = serde_json::json!(temperature);
        }
        payload
    }
}

#[async_trait]
impl LlmBackend for OpenAiClient {
    async fn complete(&self, request: &LlmRequest) -> Result<serde_json::Value, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        debug!(
            "Sending {} request to {} ({})",
            request.schema.name, self.base_url, request.model
        );

        let http_request = HttpRequest::post(format!("{}/chat/completions", self.base_url))
            .bearer(api_key)
            .json(Self::payload(request));

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(LlmError::Status {
                status: response.status,
                body: response.text,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .map_err(|e| LlmError::Malformed(e.to_string()))?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| LlmError::Malformed("response has no choices".to_string()))?;

        if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
            return Err(LlmError::Refusal(refusal));
        }

        let content = message
            .content
            .ok_or_else(|| LlmError::Malformed("response has no content".to_string()))?;

        serde_json::from_str(&content).map_err(|e| LlmError::Malformed(e.to_string()))
    }
}
