//! Progress reporting for a refresh cycle, decoupled from any presentation layer.

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::jobs::models::Platform;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScrapeEvent {
    SourceStarted { platform: Platform, pages: usize },
    PageParsed { platform: Platform, page: u32, records: usize },
    PageSkipped { platform: Platform, page: u32, reason: String },
    EndOfResults { platform: Platform, page: u32 },
    SourceFinished { platform: Platform, records: usize },
    SourceFailed { platform: Platform, reason: String },
}

/// Receives events as the pipeline runs. Implementations must not block.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ScrapeEvent);
}

/// Default sink: writes every event to the log.
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn emit(&self, event: ScrapeEvent) {
        match event {
            ScrapeEvent::SourceStarted { platform, pages } => {
                info!("Scraping {platform} ({pages} pages)")
            }
            ScrapeEvent::PageParsed {
                platform,
                page,
                records,
            } => debug!("{platform} page {page}: {records} records"),
            ScrapeEvent::PageSkipped {
                platform,
                page,
                reason,
            } => warn!("{platform} page {page} skipped: {reason}"),
            ScrapeEvent::EndOfResults { platform, page } => {
                info!("{platform}: no listings on page {page}, stopping")
            }
            ScrapeEvent::SourceFinished { platform, records } => {
                info!("{platform} finished with {records} records")
            }
            ScrapeEvent::SourceFailed { platform, reason } => {
                warn!("{platform} failed: {reason}")
            }
        }
    }
}

/// Channel sink for callers that stream progress elsewhere. A closed receiver
/// is ignored.
impl ProgressSink for UnboundedSender<ScrapeEvent> {
    fn emit(&self, event: ScrapeEvent) {
        let _ = self.send(event);
    }
}
