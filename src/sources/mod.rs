//! MCP recommendation sources
//!
//! Defines the SourceHandler trait, a registry, and the curated-list and
//! catalog-page handlers.

mod loader;
mod registry;
mod traits;

pub mod curated;
pub mod directory;

pub use curated::CuratedListSource;
pub use directory::DirectorySource;
pub use loader::SourceLoader;
pub use registry::SourceRegistry;
pub use traits::*;
