//! Memoized repository star counts

use crate::network::RepositoryHost;
use anyhow::Result;
use moka::future::Cache;
use std::time::Duration;

/// Cache for star counts keyed by `owner/repo`
///
/// Only successful lookups are stored.
pub struct StarCache {
    cache: Cache<String, u64>,
}

impl StarCache {
    /// Create a new star cache with specified TTL
    pub fn new(ttl_seconds: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(10_000)
            .build();

        Self { cache }
    }

    /// Return the cached count or ask the host
    pub async fn get_or_fetch(&self, repo: &str, host: &dyn RepositoryHost) -> Result<u64> {
        if let Some(stars) = self.cache.get(repo).await {
            return Ok(stars);
        }
        let stars = host.stars(repo).await?;
        self.cache.insert(repo.to_string(), stars).await;
        Ok(stars)
    }
}

impl Default for StarCache {
    fn default() -> Self {
        Self::new(3600)
    }
}
