//! Result records and search reports
//!
//! This module defines the record shape returned to callers and the
//! per-source outcome report built by the orchestrator.

mod report;
mod types;

pub use report::SearchReport;
pub use types::*;
