//! Caching module for MCP-Agent
//!
//! Curated documents live on disk and are refreshed weekly; star counts
//! are memoized in memory.

mod documents;
mod stars;

pub use documents::{CachedDocument, DocumentCache};
pub use stars::StarCache;
