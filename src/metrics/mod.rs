//! Metrics collection module
//!
//! Tracks per-source response times, failure rates and search counts.

use crate::results::SourceOutcome;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Response times kept per source
const RESPONSE_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct SourceCounters {
    searches: u64,
    successes: u64,
    errors: u64,
    response_times: VecDeque<u64>,
}

/// Process-wide metrics collector
pub struct Metrics {
    total_searches: AtomicU64,
    sources: RwLock<HashMap<String, SourceCounters>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            sources: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, SourceCounters>> {
        self.sources.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SourceCounters>> {
        self.sources.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how one source fared in a search
    pub fn record_outcome(&self, outcome: &SourceOutcome) {
        let mut sources = self.write();
        let counters = sources.entry(outcome.source.clone()).or_default();

        counters.searches += 1;
        if outcome.is_success() {
            counters.successes += 1;
        } else {
            counters.errors += 1;
        }

        if counters.response_times.len() >= RESPONSE_WINDOW {
            counters.response_times.pop_front();
        }
        counters
            .response_times
            .push_back(outcome.elapsed.as_millis() as u64);
    }

    pub fn total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Average response time of the recent window, in ms
    pub fn avg_response_time(&self, source: &str) -> Option<u64> {
        self.read().get(source).and_then(average)
    }

    /// Percentage of successful searches; 100 for an unused source
    pub fn reliability(&self, source: &str) -> f64 {
        self.read().get(source).map(reliability).unwrap_or(100.0)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let sources = self
            .read()
            .iter()
            .map(|(name, counters)| {
                (
                    name.clone(),
                    SourceStats {
                        searches: counters.searches,
                        errors: counters.errors,
                        avg_response_time: average(counters),
                        reliability: reliability(counters),
                    },
                )
            })
            .collect();

        MetricsSnapshot {
            total_searches: self.total_searches(),
            sources,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn average(counters: &SourceCounters) -> Option<u64> {
    if counters.response_times.is_empty() {
        None
    } else {
        Some(counters.response_times.iter().sum::<u64>() / counters.response_times.len() as u64)
    }
}

fn reliability(counters: &SourceCounters) -> f64 {
    let total = counters.successes + counters.errors;
    if total == 0 {
        100.0
    } else {
        (counters.successes as f64 / total as f64) * 100.0
    }
}

/// Statistics for a single source
#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub searches: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

/// Point-in-time copy of all metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub sources: BTreeMap<String, SourceStats>,
}
