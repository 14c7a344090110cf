//! Mermaid flowcharts for single use cases

use crate::llm::{parse_structured, LlmBackend, LlmRequest, OutputSchema};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const FLOWCHART_SCHEMA: &str = "FlowchartResponse";

const SYSTEM_PROMPT: &str = r#"Generate a concise and clear Mermaid flowchart (graph TD) from a use case description. Show the main steps, actors and interactions of the use case, keeping it simple. The Mermaid syntax must be valid.

# Steps

1. Identify the main steps, actors and interactions in the description.
2. Turn them into nodes and links.
3. Write the flowchart as graph TD in valid Mermaid syntax.

# Example

Use case: "User purchases a book from an online store. User selects a book, adds to cart, proceeds to checkout, enters payment information, and confirms the purchase. System processes the order and sends a confirmation email."

flowchart_mermaid_code:
graph TD
    A[User] --> B[Selects Book]
    B --> C[Adds to Cart]
    C --> D[Proceeds to Checkout]
    D --> E[Enters Payment Information]
    E --> F[Confirms Purchase]
    F --> G[System Processes Order]
    G --> H[Sends Confirmation Email]

reply: "Here is the flowchart for the use case."
"#;

/// Characters of a description quoted in log lines
const LOG_PREVIEW: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flowchart {
    pub flowchart_mermaid_code: String,
    pub reply: String,
}

fn schema() -> OutputSchema {
    OutputSchema::new(
        FLOWCHART_SCHEMA,
        serde_json::json!({
            "type": "object",
            "properties": {
                "flowchart_mermaid_code": {
                    "type": "string",
                    "description": "Mermaid code of the flowchart for the use case"
                },
                "reply": {
                    "type": "string",
                    "description": "A short reply to the user accompanying the flowchart"
                }
            },
            "required": ["flowchart_mermaid_code", "reply"],
            "additionalProperties": false
        }),
    )
}

/// Strip a ```mermaid fence the model sometimes wraps around the code
fn unfence(code: &str) -> String {
    let trimmed = code.trim();
    match trimmed
        .strip_prefix("```mermaid")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
    {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}

pub struct FlowchartGenerator {
    llm: Arc<dyn LlmBackend>,
    model: String,
}

impl FlowchartGenerator {
    pub fn new(llm: Arc<dyn LlmBackend>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Draw a flowchart; blank input or any failure gives `None`
    pub async fn generate(&self, description: &str) -> Option<Flowchart> {
        if description.trim().is_empty() {
            warn!("Use case description is empty. Cannot generate flowchart.");
            return None;
        }

        let preview: String = description.chars().take(LOG_PREVIEW).collect();
        let request = LlmRequest::new(
            self.model.clone(),
            SYSTEM_PROMPT,
            format!(
                "Generate a Mermaid flowchart (graph TD) for the following use case:\n\n'{}'\n",
                description
            ),
            schema(),
        )
        .with_temperature(0.0);

        info!("Generating flowchart for use case: '{}...'", preview);
        match parse_structured::<Flowchart>(self.llm.as_ref(), &request).await {
            Ok(mut flowchart) => {
                flowchart.flowchart_mermaid_code = unfence(&flowchart.flowchart_mermaid_code);
                if flowchart.flowchart_mermaid_code.is_empty() {
                    warn!("Empty flowchart for use case: '{}...'", preview);
                    return None;
                }
                Some(flowchart)
            }
            Err(e) => {
                error!("Error generating flowchart for use case '{}...': {}", preview, e);
                None
            }
        }
    }
}
