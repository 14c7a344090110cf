//! Aggregated outcome of one orchestrated search

use super::types::*;

/// Per-source outcomes of a search, in source registration order
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    outcomes: Vec<SourceOutcome>,
}

impl SearchReport {
    pub fn new(outcomes: Vec<SourceOutcome>) -> Self {
        Self { outcomes }
    }

    /// Outcomes in registration order
    pub fn outcomes(&self) -> &[SourceOutcome] {
        &self.outcomes
    }

    /// Records of all successful sources, concatenated in registration order
    pub fn results(&self) -> Vec<ResultRecord> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flat_map(|records| records.iter().cloned())
            .collect()
    }

    /// Consume the report, keeping only the merged records
    pub fn into_results(self) -> Vec<ResultRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|o| o.result.ok())
            .flatten()
            .collect()
    }

    /// Total number of merged records
    pub fn result_count(&self) -> usize {
        self.outcomes.iter().map(SourceOutcome::result_count).sum()
    }

    /// Sources that failed
    pub fn unresponsive(&self) -> Vec<UnresponsiveSource> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                Err(error) => Some(UnresponsiveSource {
                    name: o.source.clone(),
                    error: error.clone(),
                }),
                Ok(_) => None,
            })
            .collect()
    }

    /// Whether every source failed
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| !o.is_success())
    }

    /// Timing of each source
    pub fn timings(&self) -> Vec<Timing> {
        self.outcomes
            .iter()
            .map(|o| Timing {
                source: o.source.clone(),
                time_ms: o.elapsed.as_millis() as u64,
                result_count: o.result_count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;
    use std::time::Duration;

    fn outcome(source: &str, result: Result<Vec<ResultRecord>, SourceFailure>) -> SourceOutcome {
        SourceOutcome {
            source: source.to_string(),
            elapsed: Duration::from_millis(12),
            result,
        }
    }

    #[test]
    fn test_results_keep_registration_order() {
        let report = SearchReport::new(vec![
            outcome("a", Ok(vec![record("a1"), record("a2")])),
            outcome("b", Err(SourceFailure::Failed("down".to_string()))),
            outcome("c", Ok(vec![record("c1")])),
        ]);

        let names: Vec<String> = report.results().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a1", "a2", "c1"]);
        assert_eq!(report.result_count(), 3);
        assert!(!report.all_failed());

        let unresponsive = report.unresponsive();
        assert_eq!(unresponsive.len(), 1);
        assert_eq!(unresponsive[0].name, "b");

        let timings = report.timings();
        assert_eq!(timings[0].result_count, 2);
        assert_eq!(timings[1].result_count, 0);
        assert_eq!(timings[2].time_ms, 12);

        assert_eq!(report.into_results().len(), 3);
    }

    #[test]
    fn test_all_failed() {
        let report = SearchReport::new(vec![
            outcome("a", Err(SourceFailure::Failed("x".to_string()))),
            outcome("b", Err(SourceFailure::Panicked("y".to_string()))),
        ]);
        assert!(report.all_failed());
        assert!(report.results().is_empty());
        assert!(!SearchReport::default().all_failed());
    }
}
