//! Application state shared across handlers

use crate::analysis::Analyzer;
use crate::config::Settings;
use crate::llm::LlmBackend;
use crate::metrics::Metrics;
use crate::search::SearchManager;
use crate::sources::SourceRegistry;
use anyhow::bail;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Source orchestrator
    pub search: Arc<SearchManager>,
    /// Requirements pipeline
    pub analyzer: Arc<Analyzer>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        settings: Settings,
        registry: SourceRegistry,
        llm: Arc<dyn LlmBackend>,
    ) -> anyhow::Result<Self> {
        if registry.is_empty() {
            bail!("No sources enabled; check search.sources in the settings");
        }

        let settings = Arc::new(settings);
        let metrics = Arc::new(Metrics::new());
        let search = Arc::new(SearchManager::new(Arc::new(registry)).with_metrics(metrics.clone()));
        let analyzer = Arc::new(Analyzer::from_settings(&settings, llm, search.clone()));
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings,
            search,
            analyzer,
            templates,
            metrics,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    /// Deadline of one orchestrated search, if configured
    pub fn search_deadline(&self) -> Option<Duration> {
        self.settings.search_deadline()
    }
}
