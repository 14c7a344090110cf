//! Orchestrator query model

use serde::{Deserialize, Serialize};

/// A use case turned into a search query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UseCaseQuery {
    pub title: String,
    pub description: String,
    /// Mermaid source, when a flowchart could be drawn
    pub flowchart: Option<String>,
}

impl UseCaseQuery {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            flowchart: None,
        }
    }

    pub fn with_flowchart(mut self, flowchart: Option<String>) -> Self {
        self.flowchart = flowchart;
        self
    }

    /// Text handed to every source
    pub fn to_query(&self) -> String {
        let mut query = format!(
            "Use Case Title: {}\nUse Case Description: {}",
            self.title, self.description
        );
        if let Some(flowchart) = &self.flowchart {
            query.push_str("\nMermaid Flowchart:\n");
            query.push_str(flowchart);
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_flowchart() {
        let query = UseCaseQuery::new("Plant ID", "Identify plants from photos");
        assert_eq!(
            query.to_query(),
            "Use Case Title: Plant ID\nUse Case Description: Identify plants from photos"
        );
    }

    #[test]
    fn test_query_with_flowchart() {
        let query = UseCaseQuery::new("Plant ID", "Identify plants")
            .with_flowchart(Some("graph TD\nA-->B".to_string()));
        assert!(query
            .to_query()
            .ends_with("Use Case Description: Identify plants\nMermaid Flowchart:\ngraph TD\nA-->B"));
    }
}
