//! Requirements to recommendations pipeline

use super::flowchart::{Flowchart, FlowchartGenerator};
use super::input::clean_requirements;
use super::use_cases::{UseCase, UseCaseGenerator, UseCaseSet};
use crate::config::Settings;
use crate::llm::LlmBackend;
use crate::results::{ResultRecord, SearchReport, Timing, UnresponsiveSource};
use crate::search::{SearchManager, UseCaseQuery};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Recommendations found for one use case
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recommendations {
    pub results: Vec<ResultRecord>,
    pub unresponsive: Vec<UnresponsiveSource>,
    pub timings: Vec<Timing>,
    /// Set when the whole search was abandoned
    pub error: Option<String>,
}

impl From<SearchReport> for Recommendations {
    fn from(report: SearchReport) -> Self {
        Self {
            unresponsive: report.unresponsive(),
            timings: report.timings(),
            results: report.into_results(),
            error: None,
        }
    }
}

/// One use case after flowchart drawing and search
#[derive(Debug, Clone, Serialize)]
pub struct UseCaseAnalysis {
    pub use_case: UseCase,
    pub flowchart: Option<Flowchart>,
    pub query: String,
    pub recommendations: Recommendations,
}

/// Result of the first pipeline stage
#[derive(Debug, Clone)]
pub enum Preparation {
    /// Nothing but whitespace was entered
    EmptyInput,
    /// The model produced no use cases
    NoUseCases {
        requirements: String,
        reply: Option<String>,
    },
    Ready {
        requirements: String,
        set: UseCaseSet,
    },
}

/// Full analysis of one requirements text
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub requirements: Option<String>,
    pub reply: Option<String>,
    pub use_cases: Vec<UseCaseAnalysis>,
    /// Use cases dropped beyond the configured maximum
    pub skipped: usize,
}

impl Analysis {
    pub fn is_empty_input(&self) -> bool {
        self.requirements.is_none()
    }
}

pub struct Analyzer {
    use_cases: UseCaseGenerator,
    flowcharts: FlowchartGenerator,
    search: Arc<SearchManager>,
    max_use_cases: usize,
    deadline: Option<Duration>,
}

impl Analyzer {
    pub fn new(
        use_cases: UseCaseGenerator,
        flowcharts: FlowchartGenerator,
        search: Arc<SearchManager>,
    ) -> Self {
        Self {
            use_cases,
            flowcharts,
            search,
            max_use_cases: usize::MAX,
            deadline: None,
        }
    }

    pub fn from_settings(
        settings: &Settings,
        llm: Arc<dyn LlmBackend>,
        search: Arc<SearchManager>,
    ) -> Self {
        Self::new(
            UseCaseGenerator::new(llm.clone(), settings.llm.use_case_model.clone()),
            FlowchartGenerator::new(llm, settings.llm.flowchart_model.clone()),
            search,
        )
        .with_max_use_cases(settings.ui.max_tabs)
        .with_deadline(settings.search_deadline())
    }

    pub fn with_max_use_cases(mut self, max: usize) -> Self {
        self.max_use_cases = max;
        self
    }

    /// Bound each orchestrated search
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Clean the requirements and extract use cases
    pub async fn prepare(&self, raw: &str) -> Preparation {
        let requirements = match clean_requirements(raw) {
            Some(requirements) => requirements,
            None => {
                warn!("No input received.");
                return Preparation::EmptyInput;
            }
        };

        match self.use_cases.generate(&requirements).await {
            Some(set) if !set.use_cases.is_empty() => Preparation::Ready { requirements, set },
            other => {
                warn!("No use cases were generated, or an error occurred.");
                Preparation::NoUseCases {
                    requirements,
                    reply: other.map(|set| set.reply),
                }
            }
        }
    }

    /// Draw the flowchart of one use case and search recommendations for it
    pub async fn process(&self, use_case: &UseCase) -> UseCaseAnalysis {
        info!("Processing use case: '{}' (ID: {})", use_case.title, use_case.id);

        let flowchart = self.flowcharts.generate(&use_case.description).await;
        if flowchart.is_none() {
            warn!("Could not generate flowchart for use case: {}", use_case.title);
        }

        let query = UseCaseQuery::new(&use_case.title, &use_case.description)
            .with_flowchart(flowchart.as_ref().map(|f| f.flowchart_mermaid_code.clone()))
            .to_query();

        info!("Searching for MCPs/APIs for use case: '{}'", use_case.title);
        let recommendations = match self.search.search_within(&query, self.deadline).await {
            Ok(report) => Recommendations::from(report),
            Err(e) => {
                warn!("Search for use case '{}' failed: {:#}", use_case.title, e);
                Recommendations {
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };

        UseCaseAnalysis {
            use_case: use_case.clone(),
            flowchart,
            query,
            recommendations,
        }
    }

    /// Run the whole pipeline, use cases in order
    pub async fn analyze(&self, raw: &str) -> Analysis {
        let (requirements, set) = match self.prepare(raw).await {
            Preparation::EmptyInput => return Analysis::default(),
            Preparation::NoUseCases {
                requirements,
                reply,
            } => {
                return Analysis {
                    requirements: Some(requirements),
                    reply,
                    ..Default::default()
                }
            }
            Preparation::Ready { requirements, set } => (requirements, set),
        };

        let skipped = set.use_cases.len().saturating_sub(self.max_use_cases);
        if skipped > 0 {
            warn!(
                "Maximum number of use cases ({}) reached, skipping {}",
                self.max_use_cases, skipped
            );
        }

        let mut use_cases = Vec::new();
        for use_case in set.use_cases.iter().take(self.max_use_cases) {
            use_cases.push(self.process(use_case).await);
        }

        Analysis {
            requirements: Some(requirements),
            reply: Some(set.reply),
            use_cases,
            skipped,
        }
    }
}
