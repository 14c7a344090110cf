//! Use case extraction from product requirements

use crate::llm::{parse_structured, LlmBackend, LlmError, LlmRequest, OutputSchema};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const USE_CASES_SCHEMA: &str = "UseCaseResponse";

/// Reply used when the model could not be reached or misbehaved
pub const APOLOGY: &str = "Sorry, I couldn't generate use cases for this.";

const SYSTEM_PROMPT: &str = "You are an expert product analyst. Identify and extract the distinct \
use cases in the product requirements you are given. For each use case, provide a concise title \
and a brief description.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub id: u32,
    pub title: String,
    pub description: String,
}

/// Use cases plus the model's reply to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseSet {
    pub use_cases: Vec<UseCase>,
    pub reply: String,
}

impl UseCaseSet {
    fn apology() -> Self {
        Self {
            use_cases: Vec::new(),
            reply: APOLOGY.to_string(),
        }
    }
}

fn schema() -> OutputSchema {
    OutputSchema::new(
        USE_CASES_SCHEMA,
        serde_json::json!({
            "type": "object",
            "properties": {
                "use_cases": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer"},
                            "title": {"type": "string"},
                            "description": {"type": "string"}
                        },
                        "required": ["id", "title", "description"],
                        "additionalProperties": false
                    }
                },
                "reply": {"type": "string"}
            },
            "required": ["use_cases", "reply"],
            "additionalProperties": false
        }),
    )
}

pub struct UseCaseGenerator {
    llm: Arc<dyn LlmBackend>,
    model: String,
}

impl UseCaseGenerator {
    pub fn new(llm: Arc<dyn LlmBackend>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Extract use cases
    ///
    /// Returns `None` for blank requirements or a missing API key; other
    /// failures give an empty set carrying [`APOLOGY`].
    pub async fn generate(&self, requirements: &str) -> Option<UseCaseSet> {
        if requirements.trim().is_empty() {
            warn!("Requirements text is empty. Cannot generate use cases.");
            return None;
        }

        let request = LlmRequest::new(
            self.model.clone(),
            SYSTEM_PROMPT,
            format!("Here are the product requirements:\n\n{}", requirements),
            schema(),
        );

        info!("Requesting use case generation...");
        match parse_structured::<UseCaseSet>(self.llm.as_ref(), &request).await {
            Ok(set) => {
                info!("Generated {} use cases", set.use_cases.len());
                Some(set)
            }
            Err(LlmError::MissingApiKey) => {
                error!("LLM API key not found. Please set OPENAI_API_KEY.");
                None
            }
            Err(e) => {
                error!("Use case generation failed: {}", e);
                Some(UseCaseSet::apology())
            }
        }
    }
}
