//! Freshness Cache: decides between serving the persisted table and refreshing
//! it from the sources, based on the artifact's age.
//!
//! There is no scheduler; callers trigger `load`/`refresh` and must serialize
//! them per artifact path.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::jobs::aggregator::{AggregateError, Aggregator, SourceContribution};
use crate::jobs::models::{JobTable, Platform};
use crate::jobs::progress::{ProgressSink, TracingProgress};
use crate::jobs::store::{JobStore, StoreError};

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 3600);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Freshness {
    Absent,
    Fresh { age: Duration },
    Stale { age: Duration },
}

/// How the returned table was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    /// Served from the artifact without network access.
    Fresh,
    /// Scraped and persisted just now.
    Refreshed,
    /// Refresh produced nothing; the previous artifact is served unchanged.
    StaleFallback,
    /// Refresh produced nothing and there is no usable artifact.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct CachedJobs {
    pub table: JobTable,
    pub status: CacheStatus,
    pub last_updated: Option<DateTime<Utc>>,
    /// Per-source counts, only populated when a refresh ran.
    pub contributions: Vec<SourceContribution>,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to persist job table: {0}")]
    Persist(#[from] StoreError),
}

pub struct FreshnessCache {
    store: JobStore,
    aggregator: Aggregator,
    ttl: Duration,
    progress: Arc<dyn ProgressSink>,
}

impl FreshnessCache {
    pub fn new(store: JobStore, aggregator: Aggregator, ttl: Duration) -> Self {
        Self {
            store,
            aggregator,
            ttl,
            progress: Arc::new(TracingProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.aggregator.platforms()
    }

    pub fn freshness(&self) -> Freshness {
        let Some(modified) = self.store.modified() else {
            return Freshness::Absent;
        };
        // A timestamp in the future counts as brand new.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age <= self.ttl {
            Freshness::Fresh { age }
        } else {
            Freshness::Stale { age }
        }
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.store.modified().map(DateTime::<Utc>::from)
    }

    /// Serves the artifact while it is fresh; otherwise refreshes.
    pub async fn load(&self) -> Result<CachedJobs, CacheError> {
        match self.freshness() {
            Freshness::Fresh { .. } => match self.store.load() {
                Ok(table) => {
                    return Ok(CachedJobs {
                        table,
                        status: CacheStatus::Fresh,
                        last_updated: self.last_updated(),
                        contributions: Vec::new(),
                    })
                }
                Err(e) => warn!("Fresh artifact is unreadable, refreshing: {e}"),
            },
            Freshness::Stale { age } => info!(
                "Job data is {}h old (ttl {}h), refreshing",
                age.as_secs() / 3600,
                self.ttl.as_secs() / 3600
            ),
            Freshness::Absent => info!(
                "No job data at {}, scraping",
                self.store.path().display()
            ),
        }

        self.refresh().await
    }

    /// Scrapes all sources and replaces the artifact. When nothing comes back the
    /// previous artifact is left in place and served; only a failed write is an
    /// error.
    pub async fn refresh(&self) -> Result<CachedJobs, CacheError> {
        match self.aggregator.aggregate(Arc::clone(&self.progress)).await {
            Ok(aggregation) => {
                self.store.save(&aggregation.table)?;
                Ok(CachedJobs {
                    table: aggregation.table,
                    status: CacheStatus::Refreshed,
                    last_updated: self.last_updated(),
                    contributions: aggregation.contributions,
                })
            }
            Err(AggregateError::NothingNew { contributions }) => {
                Ok(self.fallback(contributions))
            }
        }
    }

    fn fallback(&self, contributions: Vec<SourceContribution>) -> CachedJobs {
        let unavailable = |contributions| CachedJobs {
            table: JobTable::default(),
            status: CacheStatus::Unavailable,
            last_updated: None,
            contributions,
        };

        if !self.store.exists() {
            warn!("Failed to scrape jobs from every source and no saved data exists");
            return unavailable(contributions);
        }

        match self.store.load() {
            Ok(table) => {
                warn!(
                    "Failed to scrape jobs from every source; serving {} saved jobs",
                    table.len()
                );
                CachedJobs {
                    table,
                    status: CacheStatus::StaleFallback,
                    last_updated: self.last_updated(),
                    contributions,
                }
            }
            Err(e) => {
                warn!("Failed to scrape jobs and saved data is unreadable: {e}");
                unavailable(contributions)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::aggregator::tests::{freshersworld_page, internshala_page, mock_aggregator};
    use crate::jobs::models::{normalize, Platform, RawListing};
    use crate::jobs::progress::ScrapeEvent;
    use mockito::{Matcher, Server, ServerGuard};
    use std::path::Path;
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    fn seed_artifact(path: &Path, titles: &[&str], age: Duration) -> JobTable {
        let table = JobTable::new(
            titles
                .iter()
                .map(|t| {
                    normalize(
                        Platform::FreshersWorld,
                        RawListing {
                            title: Some(t.to_string()),
                            ..RawListing::default()
                        },
                    )
                    .unwrap()
                })
                .collect(),
        );
        JobStore::new(path).save(&table).unwrap();
        set_age(path, age);
        table
    }

    fn set_age(path: &Path, age: Duration) {
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    fn cache(server: &ServerGuard, path: &Path) -> FreshnessCache {
        FreshnessCache::new(JobStore::new(path), mock_aggregator(server), DEFAULT_TTL)
    }

    async fn failing_upstream() -> ServerGuard {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        server
    }

    #[tokio::test]
    async fn test_fresh_artifact_is_served_without_network() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");
        let seeded = seed_artifact(&path, &["Java Developer", "QA Analyst"], 2 * HOUR);

        let mut server = Server::new_async().await;
        let upstream = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let cache = cache(&server, &path);
        assert!(matches!(cache.freshness(), Freshness::Fresh { .. }));

        let first = cache.load().await.unwrap();
        let bytes_after_first = std::fs::read(&path).unwrap();
        let second = cache.load().await.unwrap();

        assert_eq!(first.status, CacheStatus::Fresh);
        assert_eq!(first.table, seeded);
        assert_eq!(second.table, first.table);
        assert_eq!(std::fs::read(&path).unwrap(), bytes_after_first);
        upstream.assert_async().await;
    }

    #[tokio::test]
    async fn test_stale_artifact_is_replaced_by_refresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");
        seed_artifact(&path, &["Old Listing"], 30 * HOUR);

        let titles: Vec<String> = (1..=50).map(|i| format!("Backend Engineer {i}")).collect();
        let titles: Vec<&str> = titles.iter().map(String::as_str).collect();

        let mut server = Server::new_async().await;
        server
            .mock("GET", "/jobs/information-technology-jobs/page-1")
            .with_status(200)
            .with_body(internshala_page(&titles))
            .create_async()
            .await;
        server
            .mock("GET", "/jobs/category/it-software-job-vacancies")
            .with_status(200)
            .with_body(freshersworld_page(&[]))
            .create_async()
            .await;

        let cache = cache(&server, &path);
        assert!(matches!(cache.freshness(), Freshness::Stale { .. }));

        let result = cache.load().await.unwrap();
        assert_eq!(result.status, CacheStatus::Refreshed);
        assert_eq!(result.table.len(), 50);

        match cache.freshness() {
            Freshness::Fresh { age } => assert!(age < Duration::from_secs(60)),
            other => panic!("expected fresh artifact, got {other:?}"),
        }
        let persisted = JobStore::new(&path).load().unwrap();
        assert_eq!(persisted.len(), 50);
        assert!(persisted.records.iter().all(|r| r.title != "Old Listing"));
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_previous_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");
        let seeded = seed_artifact(&path, &["Scrum Master", "SEO Analyst"], 30 * HOUR);
        let bytes_before = std::fs::read(&path).unwrap();

        let server = failing_upstream().await;
        let result = cache(&server, &path).load().await.unwrap();

        assert_eq!(result.status, CacheStatus::StaleFallback);
        assert_eq!(result.table, seeded);
        assert_eq!(std::fs::read(&path).unwrap(), bytes_before);
    }

    #[tokio::test]
    async fn test_failed_refresh_without_artifact_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");

        let server = failing_upstream().await;
        let cache = cache(&server, &path);
        assert_eq!(cache.freshness(), Freshness::Absent);

        let result = cache.load().await.unwrap();
        assert_eq!(result.status, CacheStatus::Unavailable);
        assert!(result.table.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_forced_refresh_ignores_freshness() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");
        seed_artifact(&path, &["Old Listing"], HOUR);

        let mut server = Server::new_async().await;
        let page = server
            .mock("GET", "/jobs/category/it-software-job-vacancies")
            .with_status(200)
            .with_body(freshersworld_page(&["Flutter Developer"]))
            .expect(1)
            .create_async()
            .await;

        let result = cache(&server, &path).refresh().await.unwrap();
        assert_eq!(result.status, CacheStatus::Refreshed);
        assert_eq!(result.table.records[0].title, "Flutter Developer");
        assert_eq!(result.contributions.len(), 2);
        page.assert_async().await;
    }

    #[tokio::test]
    async fn test_persistence_failure_surfaces_and_keeps_nothing_partial() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory sits where the artifact should go.
        let path = dir.path().join("jobs.csv");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let mut server = Server::new_async().await;
        server
            .mock("GET", "/jobs/information-technology-jobs/page-1")
            .with_status(200)
            .with_body(internshala_page(&["Data Engineer"]))
            .create_async()
            .await;

        let err = cache(&server, &path).refresh().await.unwrap_err();
        assert!(matches!(err, CacheError::Persist(_)));
        assert!(path.join("keep").exists());
    }

    #[tokio::test]
    async fn test_refresh_reports_progress_through_channel_sink() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");

        let mut server = Server::new_async().await;
        server
            .mock("GET", "/jobs/information-technology-jobs/page-1")
            .with_status(200)
            .with_body(internshala_page(&["Go Developer"]))
            .create_async()
            .await;

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let result = cache(&server, &path)
            .with_progress(Arc::new(tx))
            .refresh()
            .await
            .unwrap();
        assert_eq!(result.status, CacheStatus::Refreshed);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        let finished: Vec<&ScrapeEvent> = events
            .iter()
            .filter(|e| matches!(e, ScrapeEvent::SourceFinished { .. }))
            .collect();
        assert_eq!(
            finished,
            vec![
                &ScrapeEvent::SourceFinished {
                    platform: Platform::Internshala,
                    records: 1,
                },
                &ScrapeEvent::SourceFinished {
                    platform: Platform::FreshersWorld,
                    records: 0,
                },
            ]
        );
        assert!(events.iter().any(|e| matches!(
            e,
            ScrapeEvent::PageSkipped {
                platform: Platform::FreshersWorld,
                page: 1,
                ..
            }
        )));
    }
}
