//! On-disk cache of curated README documents

use crate::config::{CuratedDocumentConfig, GitHubSettings};
use crate::network::RepositoryHost;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A curated document as served to the matcher
#[derive(Debug, Clone)]
pub struct CachedDocument {
    /// `owner/repo` the document comes from
    pub repo: String,
    /// Heading keyword narrowing the document, if any
    pub section: Option<String>,
    /// Raw markdown
    pub text: String,
    /// Whether the text was refetched during this load
    pub refreshed: bool,
}

/// Curated documents cached as plain files, refreshed when older than `max_age`
///
/// Freshness is the cache file's modification time, so touching a file
/// resets its clock. Files must exist before the first load.
pub struct DocumentCache {
    documents: Vec<CuratedDocumentConfig>,
    max_age: Duration,
}

impl DocumentCache {
    pub fn new(documents: Vec<CuratedDocumentConfig>, max_age: Duration) -> Self {
        Self {
            documents,
            max_age,
        }
    }

    pub fn from_settings(settings: &GitHubSettings) -> Self {
        Self::new(
            settings.documents.clone(),
            Duration::days(settings.refresh_after_days),
        )
    }

    /// A file modified at `modified` is stale once more than `max_age` has passed
    pub fn is_stale(&self, modified: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(modified) > self.max_age
    }

    /// Load every document, refreshing stale ones when a host is available
    pub async fn load(&self, host: Option<&dyn RepositoryHost>) -> Result<Vec<CachedDocument>> {
        self.load_at(host, Utc::now()).await
    }

    /// Same as [`Self::load`] with an explicit clock
    pub async fn load_at(
        &self,
        host: Option<&dyn RepositoryHost>,
        now: DateTime<Utc>,
    ) -> Result<Vec<CachedDocument>> {
        if host.is_none() {
            info!("No GitHub client available, skipping cache update.");
        }

        let mut loaded = Vec::with_capacity(self.documents.len());
        for document in &self.documents {
            loaded.push(self.load_document(document, host, now).await?);
        }
        Ok(loaded)
    }

    async fn load_document(
        &self,
        document: &CuratedDocumentConfig,
        host: Option<&dyn RepositoryHost>,
        now: DateTime<Utc>,
    ) -> Result<CachedDocument> {
        let modified = modified_time(&document.path)
            .await
            .with_context(|| format!("Missing cache file {}", document.path.display()))?;
        let stale = self.is_stale(modified, now);

        match host {
            Some(host) if stale => {
                info!(
                    "Updating cache for {} (file: {})...",
                    document.repo,
                    document.path.display()
                );
                match refresh(document, host).await {
                    Ok(text) => {
                        info!("Updated {} from {}.", document.path.display(), document.repo);
                        return Ok(CachedDocument {
                            repo: document.repo.clone(),
                            section: document.section.clone(),
                            text,
                            refreshed: true,
                        });
                    }
                    Err(e) => warn!(
                        "Failed to update {} from {}: {:#}",
                        document.path.display(),
                        document.repo,
                        e
                    ),
                }
            }
            Some(_) => debug!("Cache for {} is up to date.", document.repo),
            None if stale => info!(
                "Cache for {} is {} days old; serving it without refresh",
                document.repo,
                now.signed_duration_since(modified).num_days()
            ),
            None => {}
        }

        let text = tokio::fs::read_to_string(&document.path)
            .await
            .with_context(|| format!("Failed to read {}", document.path.display()))?;

        Ok(CachedDocument {
            repo: document.repo.clone(),
            section: document.section.clone(),
            text,
            refreshed: false,
        })
    }
}

async fn modified_time(path: &Path) -> Result<DateTime<Utc>> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(DateTime::<Utc>::from(metadata.modified()?))
}

async fn refresh(document: &CuratedDocumentConfig, host: &dyn RepositoryHost) -> Result<String> {
    let text = host.readme(&document.repo).await?;
    write_replacing(&document.path, &text).await?;
    Ok(text)
}

/// Write through a sibling temp file so readers never see a partial document
async fn write_replacing(path: &Path, text: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, text).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use std::time::{Duration as StdDuration, SystemTime};

    const DAY: u64 = 24 * 60 * 60;

    fn write_aged(path: &Path, text: &str, age_days: u64) {
        std::fs::write(path, text).unwrap();
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - StdDuration::from_secs(age_days * DAY))
            .unwrap();
    }

    fn cache_for(dir: &Path) -> DocumentCache {
        DocumentCache::new(
            vec![CuratedDocumentConfig {
                repo: "org/list".to_string(),
                path: dir.join("org_list.md"),
                section: Some("servers".to_string()),
            }],
            Duration::days(7),
        )
    }

    #[tokio::test]
    async fn test_stale_document_is_refreshed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_for(dir.path());
        write_aged(&dir.path().join("org_list.md"), "old", 8);
        let host = FakeHost::new().with_readme("org/list", "fresh");

        let docs = cache.load(Some(&host)).await.unwrap();

        assert_eq!(host.readme_calls(), 1);
        assert!(docs[0].refreshed);
        assert_eq!(docs[0].text, "fresh");
        assert_eq!(docs[0].section.as_deref(), Some("servers"));
        let on_disk = std::fs::read_to_string(dir.path().join("org_list.md")).unwrap();
        assert_eq!(on_disk, "fresh");
        assert!(!dir.path().join("org_list.md.tmp").exists());
    }

    #[tokio::test]
    async fn test_fresh_document_is_not_refreshed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_for(dir.path());
        write_aged(&dir.path().join("org_list.md"), "cached", 6);
        let host = FakeHost::new().with_readme("org/list", "fresh");

        let docs = cache.load(Some(&host)).await.unwrap();

        assert_eq!(host.readme_calls(), 0);
        assert!(!docs[0].refreshed);
        assert_eq!(docs[0].text, "cached");
    }

    #[tokio::test]
    async fn test_without_host_stale_cache_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_for(dir.path());
        write_aged(&dir.path().join("org_list.md"), "ancient", 400);

        let docs = cache.load(None).await.unwrap();

        assert_eq!(docs[0].text, "ancient");
        assert!(!docs[0].refreshed);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_copy() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_for(dir.path());
        write_aged(&dir.path().join("org_list.md"), "old", 30);
        let host = FakeHost::new();

        let docs = cache.load(Some(&host)).await.unwrap();

        assert_eq!(host.readme_calls(), 1);
        assert!(!docs[0].refreshed);
        assert_eq!(docs[0].text, "old");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_for(dir.path());
        let host = FakeHost::new().with_readme("org/list", "fresh");

        assert!(cache.load(None).await.is_err());
        assert!(cache.load(Some(&host)).await.is_err());
        assert_eq!(host.readme_calls(), 0);
    }

    #[test]
    fn test_staleness_threshold_is_strict() {
        let cache = cache_for(Path::new("."));
        let now = Utc::now();
        assert!(!cache.is_stale(now - Duration::days(7), now));
        assert!(cache.is_stale(now - Duration::days(7) - Duration::seconds(1), now));
        assert!(!cache.is_stale(now - Duration::days(6), now));
        assert!(cache.is_stale(now - Duration::days(8), now));
    }
}
