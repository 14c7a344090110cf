//! HTTP request handlers

use super::state::AppState;
use crate::analysis::{Analysis, UseCaseAnalysis};
use crate::results::{ResultRecord, Timing, UnresponsiveSource};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;

/// Characters of a use case title shown in its tab label
const TAB_LABEL_TITLE: usize = 30;

/// Submitted requirements form
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub requirements: String,
}

/// Output format selector
#[derive(Debug, Default, Deserialize)]
pub struct FormatParams {
    pub format: Option<String>,
}

impl FormatParams {
    fn is_json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Search response for JSON format
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub number_of_results: usize,
    pub results: Vec<ResultRecord>,
    pub unresponsive_sources: Vec<UnresponsiveSource>,
    pub timings: Vec<Timing>,
}

/// One output tab of the analysis page
#[derive(Debug, Serialize)]
struct TabView<'a> {
    label: String,
    message: Option<String>,
    reply: Option<&'a str>,
    analysis: Option<&'a UseCaseAnalysis>,
}

impl<'a> TabView<'a> {
    fn message(label: &str, message: &str) -> Self {
        Self {
            label: label.to_string(),
            message: Some(message.to_string()),
            reply: None,
            analysis: None,
        }
    }
}

fn tab_label(index: usize, title: &str) -> String {
    let title = title.trim();
    if title.chars().count() > TAB_LABEL_TITLE {
        let short: String = title.chars().take(TAB_LABEL_TITLE).collect();
        format!("UC {}: {}...", index + 1, short.trim_end().trim_end_matches('.'))
    } else {
        format!("UC {}: {}", index + 1, title)
    }
}

fn tabs(analysis: &Analysis) -> Vec<TabView<'_>> {
    if analysis.is_empty_input() {
        return vec![TabView::message(
            "Input Error",
            "No input received. Please enter product requirements.",
        )];
    }
    if analysis.use_cases.is_empty() {
        let mut tab = TabView::message(
            "Result",
            "No use cases were generated, or an error occurred.",
        );
        tab.reply = analysis.reply.as_deref();
        return vec![tab];
    }

    analysis
        .use_cases
        .iter()
        .enumerate()
        .map(|(i, uc)| TabView {
            label: tab_label(i, &uc.use_case.title),
            message: None,
            // The generator's reply leads the first tab
            reply: if i == 0 { analysis.reply.as_deref() } else { None },
            analysis: Some(uc),
        })
        .collect()
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn base_context(state: &AppState, requirements: &str) -> Context {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("examples", &state.settings.ui.examples);
    ctx.insert("requirements", requirements);
    ctx
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> Response {
    render(&state, "index.html", &base_context(&state, ""))
}

/// Requirements analysis handler
pub async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<FormatParams>,
    Form(form): Form<AnalyzeForm>,
) -> Response {
    let analysis = state.analyzer.analyze(&form.requirements).await;

    if params.is_json() {
        return Json(analysis).into_response();
    }

    let mut ctx = base_context(&state, &form.requirements);
    ctx.insert("tabs", &tabs(&analysis));
    ctx.insert("skipped", &analysis.skipped);
    render(&state, "analysis.html", &ctx)
}

/// Orchestrated search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Missing query parameter 'q'"})),
            )
                .into_response()
        }
    };

    let report = match state.search.search_within(&query, state.search_deadline()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("Search failed: {:#}", e);
            return (
                StatusCode::GATEWAY_TIMEOUT,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    Json(SearchResponse {
        query,
        number_of_results: report.result_count(),
        unresponsive_sources: report.unresponsive(),
        timings: report.timings(),
        results: report.into_results(),
    })
    .into_response()
}

/// Metrics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let sources: Vec<serde_json::Value> = state
        .search
        .registry()
        .iter()
        .map(|source| {
            serde_json::json!({
                "name": source.name(),
                "about": source.about(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "sources": sources,
        "metrics": state.metrics.snapshot(),
    }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::USE_CASES_SCHEMA;
    use crate::config::Settings;
    use crate::llm::LlmBackend;
    use crate::sources::SourceRegistry;
    use crate::testing::{record, RoutingLlm, StaticSource};
    use std::sync::Arc;

    fn state(llm: RoutingLlm) -> AppState {
        let mut registry = SourceRegistry::new();
        registry
            .register(Arc::new(StaticSource::succeeding("github", vec![record("slack")])))
            .unwrap();
        let llm: Arc<dyn LlmBackend> = Arc::new(llm);
        AppState::new(Settings::default(), registry, llm).unwrap()
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn use_cases() -> RoutingLlm {
        RoutingLlm::new().route(
            USE_CASES_SCHEMA,
            serde_json::json!({
                "use_cases": [
                    {"id": 1, "title": "Team chat with shared notes and reminders", "description": "Chat"},
                    {"id": 2, "title": "Billing", "description": "Pay"}
                ],
                "reply": "Two use cases"
            }),
        )
    }

    #[test]
    fn test_tab_label() {
        assert_eq!(tab_label(0, "Billing"), "UC 1: Billing");
        assert_eq!(
            tab_label(1, "Team chat with shared notes and reminders"),
            "UC 2: Team chat with shared notes an..."
        );
    }

    #[tokio::test]
    async fn test_analyze_renders_one_tab_per_use_case() {
        let response = analyze(
            State(state(use_cases())),
            Query(FormatParams::default()),
            Form(AnalyzeForm {
                requirements: "Team chat and billing".to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("UC 1: Team chat with shared notes an..."));
        assert!(html.contains("UC 2: Billing"));
        assert!(html.contains("Two use cases"));
        assert!(html.contains("<dt>slack</dt>"));
        assert!(html.contains("Could not generate flowchart"));
    }

    #[tokio::test]
    async fn test_blank_requirements_show_input_error() {
        let response = analyze(
            State(state(use_cases())),
            Query(FormatParams::default()),
            Form(AnalyzeForm {
                requirements: "   ".to_string(),
            }),
        )
        .await;

        let html = body(response).await;
        assert!(html.contains("Input Error"));
        assert!(!html.contains("UC 1"));
    }

    #[tokio::test]
    async fn test_no_use_cases_show_result_tab() {
        let response = analyze(
            State(state(RoutingLlm::new())),
            Query(FormatParams::default()),
            Form(AnalyzeForm {
                requirements: "Build a shop".to_string(),
            }),
        )
        .await;

        let html = body(response).await;
        assert!(html.contains("No use cases were generated"));
    }

    #[tokio::test]
    async fn test_analyze_as_json() {
        let response = analyze(
            State(state(use_cases())),
            Query(FormatParams {
                format: Some("json".to_string()),
            }),
            Form(AnalyzeForm {
                requirements: "Team chat and billing".to_string(),
            }),
        )
        .await;

        let json: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(json["use_cases"].as_array().unwrap().len(), 2);
        assert_eq!(
            json["use_cases"][0]["recommendations"]["results"][0]["source_name"],
            "github"
        );
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let state = state(RoutingLlm::new());
        let response = search(
            State(state.clone()),
            Query(SearchParams {
                q: Some("team chat".to_string()),
            }),
        )
        .await;

        let json: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(json["number_of_results"], 1);
        assert_eq!(json["results"][0]["name"], "slack");
        assert_eq!(state.metrics.total_searches(), 1);

        let missing = search(State(state), Query(SearchParams { q: None })).await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_lists_sources_with_metadata() {
        let state = state(RoutingLlm::new());
        search(
            State(state.clone()),
            Query(SearchParams {
                q: Some("team chat".to_string()),
            }),
        )
        .await;

        let response = stats(State(state)).await.into_response();
        let json: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();

        assert_eq!(json["sources"][0]["name"], "github");
        assert_eq!(json["sources"][0]["about"]["require_api_key"], false);
        assert_eq!(json["metrics"]["total_searches"], 1);
        assert_eq!(json["metrics"]["sources"]["github"]["searches"], 1);
    }
}
