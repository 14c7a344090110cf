//! Interactive command-line loop
//!
//! Reads requirements from stdin and prints use cases, flowcharts and
//! recommendations as they are produced.

use crate::analysis::{Analyzer, Preparation, UseCase, UseCaseAnalysis, UseCaseSet};
use crate::results::ResultRecord;
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

/// Characters of a description shown per recommendation
const DESCRIPTION_PREVIEW: usize = 150;

/// Read lines until an empty line or end of input
pub async fn read_requirements<R: AsyncBufRead + Unpin>(input: R) -> Result<String> {
    let mut lines = Vec::new();
    let mut input = input.lines();
    while let Some(line) = input.next_line().await? {
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

pub fn render_requirements(requirements: &str) -> String {
    format!(
        "\n--- Cleaned Requirements ---\n{}\n--------------------------\n",
        requirements
    )
}

pub fn render_use_cases(set: &UseCaseSet) -> String {
    let mut out = format!("Reply from use case generator: {}\n", set.reply);
    out.push_str("\n--- Generated Use Cases ---\n");
    for use_case in &set.use_cases {
        out.push_str(&format!("  ID: {}\n", use_case.id));
        out.push_str(&format!("  Title: {}\n", use_case.title));
        out.push_str(&format!("  Description: {}\n", use_case.description));
        out.push_str(&format!("  {}\n", "-".repeat(20)));
    }
    out.push_str("--------------------------\n");
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

pub fn render_record(record: &ResultRecord) -> String {
    let name = if record.name.is_empty() { "N/A" } else { record.name.as_str() };
    let mut out = format!("  Name: {}\n  URL: {}\n", name, record.url);
    if record.description.is_empty() {
        out.push_str("  Description: N/A\n");
    } else {
        out.push_str(&format!(
            "  Description: {}\n",
            truncate(&record.description, DESCRIPTION_PREVIEW)
        ));
    }
    if !record.corresponding_functions.is_empty() {
        out.push_str(&format!(
            "  Functions: {}\n",
            record.corresponding_functions.join(", ")
        ));
    }
    if !record.reasoning.is_empty() {
        out.push_str(&format!("  Reasoning: {}\n", record.reasoning));
    }
    if let Some(stars) = record.stars {
        out.push_str(&format!("  Stars: {}\n", stars));
    }
    out.push_str(&format!("  {}\n", ".".repeat(20)));
    out
}

pub fn render_analysis(analysis: &UseCaseAnalysis) -> String {
    let UseCase {
        id,
        title,
        description,
    } = &analysis.use_case;
    let mut out = format!(
        "\nProcessing Use Case: {} (ID: {})\nDescription: {}\n",
        title, id, description
    );

    match &analysis.flowchart {
        Some(flowchart) => {
            out.push_str(&format!("\n--- Flowchart for {} ---\n", title));
            if !flowchart.reply.is_empty() {
                out.push_str(&format!("Flowchart Description: {}\n", flowchart.reply));
            }
            out.push_str(&format!(
                "```mermaid\n{}\n```\n",
                flowchart.flowchart_mermaid_code
            ));
            out.push_str("-----------------------------------\n");
        }
        None => out.push_str(&format!("--- No Flowchart Generated for {} ---\n", title)),
    }

    let recommendations = &analysis.recommendations;
    if let Some(error) = &recommendations.error {
        out.push_str(&format!("Search failed: {}\n", error));
    } else if recommendations.results.is_empty() {
        out.push_str(&format!("No MCPs/APIs found for use case: {}\n", title));
    } else {
        out.push_str(&format!("--- Found MCPs/APIs for Use Case: {} ---\n", title));
        for record in &recommendations.results {
            out.push_str(&render_record(record));
        }
        out.push_str("--------------------------------------------------\n");
    }
    for source in &recommendations.unresponsive {
        out.push_str(&format!("  (source {} failed: {})\n", source.name, source.error));
    }
    out.push_str(&format!("{}\n", "=".repeat(52)));
    out
}

/// Run one interactive session
pub async fn run<R, W>(analyzer: &Analyzer, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"Please enter your product requirements. Press Enter twice to finish.\n")
        .await?;
    output.flush().await?;
    let raw = read_requirements(input).await?;

    let (requirements, set) = match analyzer.prepare(&raw).await {
        Preparation::EmptyInput => {
            warn!("No input received. Exiting.");
            return Ok(());
        }
        Preparation::NoUseCases {
            requirements,
            reply,
        } => {
            let mut out = render_requirements(&requirements);
            if let Some(reply) = reply {
                out.push_str(&format!("{}\n", reply));
            }
            out.push_str("No use cases were generated.\n");
            output.write_all(out.as_bytes()).await?;
            output.flush().await?;
            return Ok(());
        }
        Preparation::Ready { requirements, set } => (requirements, set),
    };

    let header = render_requirements(&requirements) + &render_use_cases(&set);
    output.write_all(header.as_bytes()).await?;
    output.flush().await?;

    for use_case in &set.use_cases {
        let analysis = analyzer.process(use_case).await;
        output.write_all(render_analysis(&analysis).as_bytes()).await?;
        output.flush().await?;
    }

    info!("Processing complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        Flowchart, FlowchartGenerator, Recommendations, UseCaseGenerator, USE_CASES_SCHEMA,
    };
    use crate::llm::LlmBackend;
    use crate::search::SearchManager;
    use crate::sources::SourceRegistry;
    use crate::testing::{record, RoutingLlm, StaticSource};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_read_requirements_stops_at_blank_line() {
        let input = "first line\nsecond line\n\nignored\n".as_bytes();
        assert_eq!(
            read_requirements(input).await.unwrap(),
            "first line\nsecond line"
        );
        assert_eq!(read_requirements("".as_bytes()).await.unwrap(), "");
        assert_eq!(
            read_requirements("no newline".as_bytes()).await.unwrap(),
            "no newline"
        );
    }

    #[test]
    fn test_record_description_is_truncated() {
        let record = record("slack")
            .with_description("x".repeat(200))
            .with_functions(vec!["send".to_string(), "read".to_string()])
            .with_stars(42);

        let out = render_record(&record);

        assert!(out.contains(&format!("Description: {}...\n", "x".repeat(150))));
        assert!(out.contains("Functions: send, read"));
        assert!(out.contains("Stars: 42"));
        assert!(!out.contains("Reasoning"));
    }

    #[test]
    fn test_render_analysis_with_flowchart() {
        let analysis = UseCaseAnalysis {
            use_case: UseCase {
                id: 1,
                title: "Chat".to_string(),
                description: "Team chat".to_string(),
            },
            flowchart: Some(Flowchart {
                flowchart_mermaid_code: "graph TD\nA-->B".to_string(),
                reply: "Here".to_string(),
            }),
            query: String::new(),
            recommendations: Recommendations {
                results: vec![record("slack")],
                ..Default::default()
            },
        };

        let out = render_analysis(&analysis);

        assert!(out.contains("```mermaid\ngraph TD\nA-->B\n```"));
        assert!(out.contains("Name: slack"));
        assert!(out.contains("URL: https://github.com/example/slack"));
    }

    #[tokio::test]
    async fn test_run_session() {
        let llm: Arc<dyn LlmBackend> = Arc::new(RoutingLlm::new().route(
            USE_CASES_SCHEMA,
            serde_json::json!({
                "use_cases": [{"id": 1, "title": "Chat", "description": "Team chat"}],
                "reply": "One use case"
            }),
        ));
        let mut registry = SourceRegistry::new();
        registry
            .register(Arc::new(StaticSource::succeeding("github", vec![record("slack")])))
            .unwrap();
        let analyzer = Analyzer::new(
            UseCaseGenerator::new(llm.clone(), "m"),
            FlowchartGenerator::new(llm, "m"),
            Arc::new(SearchManager::new(Arc::new(registry))),
        );

        let mut output = Vec::new();
        run(&analyzer, "I need team chat\n\n".as_bytes(), &mut output)
            .await
            .unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("I need team chat"));
        assert!(output.contains("Title: Chat"));
        assert!(output.contains("No Flowchart Generated for Chat"));
        assert!(output.contains("Name: slack"));
    }

    #[tokio::test]
    async fn test_run_without_use_cases() {
        let llm: Arc<dyn LlmBackend> = Arc::new(RoutingLlm::new());
        let mut registry = SourceRegistry::new();
        registry
            .register(Arc::new(StaticSource::succeeding("github", vec![])))
            .unwrap();
        let analyzer = Analyzer::new(
            UseCaseGenerator::new(llm.clone(), "m"),
            FlowchartGenerator::new(llm, "m"),
            Arc::new(SearchManager::new(Arc::new(registry))),
        );

        let mut output = Vec::new();
        run(&analyzer, "Build a shop\n".as_bytes(), &mut output)
            .await
            .unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Build a shop"));
        assert!(output.ends_with("No use cases were generated.\n"));
    }
}
