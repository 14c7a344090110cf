//! MCP-Agent: recommends Model Context Protocol servers for product requirements
//!
//! Requirements are split into use cases by a language model, each use case
//! gets a Mermaid flowchart, and a set of pluggable sources is searched
//! concurrently for MCP servers matching it.

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod llm;
pub mod markdown;
pub mod metrics;
pub mod network;
pub mod results;
pub mod search;
pub mod sources;
pub mod web;

#[cfg(test)]
mod testing;

pub use config::Settings;
pub use results::{ResultRecord, SearchReport};
pub use search::{SearchManager, UseCaseQuery};
pub use sources::{SourceHandler, SourceRegistry};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
