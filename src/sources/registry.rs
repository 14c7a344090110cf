//! Ordered registry of source handlers

use super::traits::SourceHandler;
use anyhow::{anyhow, Result};
use std::sync::Arc;

/// Registered sources, unique by name, in registration order
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn SourceHandler>>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { sources: Vec::new() }
    }

    /// Register a source; names must be unique
    pub fn register(&mut self, source: Arc<dyn SourceHandler>) -> Result<()> {
        if self.contains(source.name()) {
            return Err(anyhow!("Source '{}' is already registered", source.name()));
        }
        self.sources.push(source);
        Ok(())
    }

    /// Get a source by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn SourceHandler>> {
        self.sources.iter().find(|s| s.name() == name)
    }

    /// Iterate in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SourceHandler>> {
        self.sources.iter()
    }

    /// Get all source names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Check if a source exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
