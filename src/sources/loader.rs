//! Source loader for building handlers from configuration

use super::curated::CuratedListSource;
use super::directory::DirectorySource;
use super::registry::SourceRegistry;
use super::traits::SourceHandler;
use crate::cache::{DocumentCache, StarCache};
use crate::config::{Settings, SourceConfig, SourceKind};
use crate::llm::LlmBackend;
use crate::network::{GitHubClient, HttpClient, RepositoryHost};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing source handlers from configuration
pub struct SourceLoader;

impl SourceLoader {
    /// Build every enabled source, in configuration order
    pub fn load(
        settings: &Settings,
        http: &HttpClient,
        llm: Arc<dyn LlmBackend>,
    ) -> Result<SourceRegistry> {
        let mut registry = SourceRegistry::new();

        for config in settings.search.sources.iter().filter(|s| s.disabled) {
            info!("Skipping disabled source: {}", config.name);
        }

        for config in settings.enabled_sources() {
            let built = Self::create_source(config, settings, http, llm.clone())
                .and_then(|source| registry.register(source));
            match built {
                Ok(()) => info!("Loaded source: {} ({:?})", config.name, config.kind),
                Err(e) => warn!("Failed to load source {}: {:#}", config.name, e),
            }
        }

        info!(
            "Loaded {} sources: {}",
            registry.len(),
            registry.names().join(", ")
        );
        Ok(registry)
    }

    fn create_source(
        config: &SourceConfig,
        settings: &Settings,
        http: &HttpClient,
        llm: Arc<dyn LlmBackend>,
    ) -> Result<Arc<dyn SourceHandler>> {
        match config.kind {
            SourceKind::Curated => {
                let mut source = CuratedListSource::new(
                    config.name.clone(),
                    llm,
                    settings.llm.matcher_model.clone(),
                    DocumentCache::from_settings(&settings.github),
                )
                .with_star_cache(StarCache::new(settings.github.star_cache_ttl));

                match &settings.github.token {
                    Some(token) => {
                        let host: Arc<dyn RepositoryHost> = Arc::new(GitHubClient::new(
                            http.clone(),
                            settings.github.api_url.clone(),
                            token.clone(),
                        ));
                        source = source.with_host(host);
                    }
                    None => warn!("GITHUB_TOKEN not set, curated lists will not be refreshed"),
                }
                Ok(Arc::new(source))
            }
            SourceKind::Directory => Ok(Arc::new(DirectorySource::new(config, http.clone())?)),
        }
    }
}
