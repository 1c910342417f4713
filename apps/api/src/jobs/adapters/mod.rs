//! Source Adapters: one per upstream career portal, behind one shared contract.
//!
//! An adapter only knows its pagination scheme and its markup. Fetching,
//! skip-on-failure, end-of-results detection and politeness delays live in the
//! provided `fetch_listings`, so every source paginates the same way.

pub mod freshersworld;
pub mod internshala;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Selector};

use crate::config::ScrapeConfig;
use crate::jobs::fetcher::{FetchError, PageFetcher};
use crate::jobs::models::{clean, normalize, JobRecord, Platform, RawListing};
use crate::jobs::progress::{ProgressSink, ScrapeEvent};

pub use freshersworld::FreshersWorldAdapter;
pub use internshala::InternshalaAdapter;

/// Result of parsing one listing page.
#[derive(Debug, Default)]
pub struct ParsedPage {
    /// Listing containers matched by the structural selectors, including ones
    /// later dropped for a blank title. Zero means end of results.
    pub containers: usize,
    pub listings: Vec<RawListing>,
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Request target for a 1-based page number.
    fn page_url(&self, page: u32) -> String;

    fn referer(&self) -> Option<String> {
        None
    }

    /// Pure markup parsing; never fails, a malformed container yields a
    /// listing with missing fields.
    fn parse_page(&self, html: &str) -> ParsedPage;

    async fn fetch_page(&self, fetcher: &PageFetcher, page: u32) -> Result<String, FetchError> {
        let referer = self.referer();
        fetcher
            .fetch_page(&self.page_url(page), referer.as_deref())
            .await
    }

    /// Fetches `pages` in ascending order and returns canonical records in
    /// source listing order. Failed pages are skipped; a page without
    /// containers stops pagination. Never fails.
    async fn fetch_listings(
        &self,
        fetcher: &PageFetcher,
        pages: &[u32],
        delay: Duration,
        progress: &dyn ProgressSink,
    ) -> Vec<JobRecord> {
        let platform = self.platform();
        let mut pages: Vec<u32> = pages.iter().copied().filter(|p| *p > 0).collect();
        pages.sort_unstable();
        pages.dedup();

        let mut records = Vec::new();
        let mut had_listings = false;

        for (idx, page) in pages.iter().copied().enumerate() {
            let html = match self.fetch_page(fetcher, page).await {
                Ok(html) => html,
                Err(e) => {
                    progress.emit(ScrapeEvent::PageSkipped {
                        platform,
                        page,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let parsed = self.parse_page(&html);
            if parsed.containers == 0 {
                if !had_listings {
                    tracing::warn!(
                        "{platform}: page {page} has no listing containers; source exhausted or markup changed"
                    );
                }
                progress.emit(ScrapeEvent::EndOfResults { platform, page });
                break;
            }
            had_listings = true;

            let before = records.len();
            for listing in parsed.listings {
                match normalize(platform, listing) {
                    Some(record) => records.push(record),
                    None => tracing::debug!("{platform} page {page}: dropped listing without title"),
                }
            }
            progress.emit(ScrapeEvent::PageParsed {
                platform,
                page,
                records: records.len() - before,
            });

            if idx + 1 < pages.len() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        records
    }
}

/// An adapter plus the pages it should fetch on a refresh.
#[derive(Clone)]
pub struct ConfiguredSource {
    pub adapter: Arc<dyn SourceAdapter>,
    pub pages: Vec<u32>,
}

/// Default adapter for a platform, pointed at the live site.
pub fn adapter_for(platform: Platform) -> Arc<dyn SourceAdapter> {
    match platform {
        Platform::Internshala => Arc::new(InternshalaAdapter::default()),
        Platform::FreshersWorld => Arc::new(FreshersWorldAdapter::default()),
    }
}

/// Builds the ordered source list from configuration.
pub fn registry(config: &ScrapeConfig) -> Vec<ConfiguredSource> {
    config
        .sources
        .iter()
        .map(|source| ConfiguredSource {
            adapter: adapter_for(source.platform),
            pages: source.page_range(),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Markup helpers shared by adapters
// ────────────────────────────────────────────────────────────────────────────

/// Elements matching the first selector in `candidates` that matches anything.
pub(crate) fn select_all<'a>(root: ElementRef<'a>, candidates: &[&str]) -> Vec<ElementRef<'a>> {
    for candidate in candidates {
        if let Ok(selector) = Selector::parse(candidate) {
            let found: Vec<_> = root.select(&selector).collect();
            if !found.is_empty() {
                return found;
            }
        }
    }
    Vec::new()
}

/// Non-blank text of the first element matched, trying selectors in order.
pub(crate) fn first_text(root: ElementRef<'_>, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        let selector = Selector::parse(candidate).ok()?;
        root.select(&selector)
            .map(element_text)
            .find_map(|text| clean(Some(text)))
    })
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
