//! Requirements analysis
//!
//! Cleans product requirements, splits them into use cases, draws a
//! flowchart per use case and searches recommendations for each.

mod flowchart;
mod input;
mod pipeline;
mod use_cases;

pub use flowchart::{Flowchart, FlowchartGenerator, FLOWCHART_SCHEMA};
pub use input::clean_requirements;
pub use pipeline::{Analysis, Analyzer, Preparation, Recommendations, UseCaseAnalysis};
pub use use_cases::{UseCase, UseCaseGenerator, UseCaseSet, APOLOGY, USE_CASES_SCHEMA};
