// Job listings pipeline: scrape → normalize → aggregate → persist with a TTL.
// Handlers only talk to `FreshnessCache`; nothing else touches the artifact.

pub mod adapters;
pub mod aggregator;
pub mod cache;
pub mod classifier;
pub mod fetcher;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod store;
