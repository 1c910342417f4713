//! Aggregator: runs every configured source concurrently and concatenates their
//! records in declaration order.
//!
//! Adapters emit `JobRecord`s directly, so the canonical schema holds by
//! construction; legacy column names only exist in old artifacts and are folded
//! in by the store on load.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::ScrapeConfig;
use crate::jobs::adapters::{registry, ConfiguredSource};
use crate::jobs::fetcher::{FetchError, PageFetcher};
use crate::jobs::models::{JobTable, Platform};
use crate::jobs::progress::{ProgressSink, ScrapeEvent};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceContribution {
    pub platform: Platform,
    pub records: usize,
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub table: JobTable,
    pub contributions: Vec<SourceContribution>,
}

#[derive(Debug, Error)]
pub enum AggregateError {
    /// Every source came back empty.
    #[error("no source returned any listings")]
    NothingNew { contributions: Vec<SourceContribution> },
}

pub struct Aggregator {
    sources: Vec<ConfiguredSource>,
    fetcher: PageFetcher,
    page_delay: Duration,
}

impl Aggregator {
    pub fn new(sources: Vec<ConfiguredSource>, fetcher: PageFetcher, page_delay: Duration) -> Self {
        Self {
            sources,
            fetcher,
            page_delay,
        }
    }

    /// Aggregator over the configured live sources.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            registry(config),
            PageFetcher::new(config.request_timeout)?,
            config.page_delay,
        ))
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.sources.iter().map(|s| s.adapter.platform()).collect()
    }

    /// Runs all sources to completion. A source that panics contributes nothing;
    /// the others are unaffected. Fails only when every source is empty.
    pub async fn aggregate(
        &self,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Aggregation, AggregateError> {
        let handles = self.sources.iter().map(|source| {
            let adapter = Arc::clone(&source.adapter);
            let pages = source.pages.clone();
            let fetcher = self.fetcher.clone();
            let delay = self.page_delay;
            let progress = Arc::clone(&progress);

            tokio::spawn(async move {
                progress.emit(ScrapeEvent::SourceStarted {
                    platform: adapter.platform(),
                    pages: pages.len(),
                });
                adapter
                    .fetch_listings(&fetcher, &pages, delay, progress.as_ref())
                    .await
            })
        });

        let results = join_all(handles).await;

        let mut records = Vec::new();
        let mut contributions = Vec::with_capacity(results.len());
        for (source, result) in self.sources.iter().zip(results) {
            let platform = source.adapter.platform();
            let source_records = match result {
                Ok(source_records) => source_records,
                Err(e) => {
                    error!("{platform} adapter task failed: {e}");
                    progress.emit(ScrapeEvent::SourceFailed {
                        platform,
                        reason: e.to_string(),
                    });
                    Vec::new()
                }
            };
            progress.emit(ScrapeEvent::SourceFinished {
                platform,
                records: source_records.len(),
            });
            contributions.push(SourceContribution {
                platform,
                records: source_records.len(),
            });
            records.extend(source_records);
        }

        if records.is_empty() {
            return Err(AggregateError::NothingNew { contributions });
        }

        info!(
            "Aggregated {} jobs ({})",
            records.len(),
            contributions
                .iter()
                .map(|c| format!("{}: {}", c.platform, c.records))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Aggregation {
            table: JobTable::new(records),
            contributions,
        })
    }
}
