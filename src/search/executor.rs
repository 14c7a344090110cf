//! Search execution and orchestration

use crate::metrics::Metrics;
use crate::results::{ResultRecord, SearchReport, SourceFailure, SourceOutcome};
use crate::sources::{SourceHandler, SourceRegistry};
use anyhow::{anyhow, Result};
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Fans a use case out to every registered source and merges the answers
pub struct SearchManager {
    registry: Arc<SourceRegistry>,
    metrics: Option<Arc<Metrics>>,
}

impl SearchManager {
    /// Create a manager over a non-empty registry
    ///
    /// # Panics
    ///
    /// Panics when the registry holds no sources.
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        assert!(!registry.is_empty(), "No source handlers provided");
        Self {
            registry,
            metrics: None,
        }
    }

    /// Record per-source outcomes into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Records of every source that succeeded, in registration order
    pub async fn search(&self, query: &str) -> Vec<ResultRecord> {
        self.search_detailed(query).await.into_results()
    }

    /// Run every source concurrently and report each outcome
    pub async fn search_detailed(&self, query: &str) -> SearchReport {
        if let Some(metrics) = &self.metrics {
            metrics.inc_search();
        }

        info!("Searching {} sources", self.registry.len());
        let outcomes = join_all(
            self.registry
                .iter()
                .map(|source| self.search_source(source.clone(), query)),
        )
        .await;

        let report = SearchReport::new(outcomes);
        info!(
            "Search finished with {} results ({} sources failed)",
            report.result_count(),
            report.unresponsive().len()
        );
        report
    }

    /// Like [`Self::search_detailed`], abandoning the whole search after `deadline`
    pub async fn search_within(
        &self,
        query: &str,
        deadline: Option<Duration>,
    ) -> Result<SearchReport> {
        match deadline {
            Some(deadline) => timeout(deadline, self.search_detailed(query))
                .await
                .map_err(|_| anyhow!("Search timed out after {:?}", deadline)),
            None => Ok(self.search_detailed(query).await),
        }
    }

    async fn search_source(&self, source: Arc<dyn SourceHandler>, query: &str) -> SourceOutcome {
        let name = source.name().to_string();
        let start = Instant::now();

        let result = match AssertUnwindSafe(source.search(query)).catch_unwind().await {
            Ok(Ok(mut records)) => {
                for record in &mut records {
                    record.source_name = name.clone();
                }
                debug!("Source {} returned {} results", name, records.len());
                Ok(records)
            }
            Ok(Err(e)) => {
                warn!("Source {} failed: {:#}", name, e);
                Err(SourceFailure::Failed(format!("{:#}", e)))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Source {} panicked: {}", name, message);
                Err(SourceFailure::Panicked(message))
            }
        };

        let outcome = SourceOutcome {
            source: name,
            elapsed: start.elapsed(),
            result,
        };
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(&outcome);
        }
        outcome
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
