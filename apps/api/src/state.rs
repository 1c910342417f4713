use std::sync::Arc;

use tokio::sync::Mutex;

use crate::jobs::cache::FreshnessCache;
use crate::resume::feedback::FeedbackGenerator;
use crate::resume::vocabulary::SkillVocabulary;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<FreshnessCache>,
    /// Held around every `load`/`refresh` so only one scrape writes the artifact.
    pub jobs_lock: Arc<Mutex<()>>,
    pub vocabulary: Arc<SkillVocabulary>,
    /// `LlmFeedback` when an API key is configured, `UnconfiguredFeedback` otherwise.
    pub feedback: Arc<dyn FeedbackGenerator>,
}

impl AppState {
    pub fn new(
        jobs: FreshnessCache,
        vocabulary: SkillVocabulary,
        feedback: Arc<dyn FeedbackGenerator>,
    ) -> Self {
        Self {
            jobs: Arc::new(jobs),
            jobs_lock: Arc::new(Mutex::new(())),
            vocabulary: Arc::new(vocabulary),
            feedback,
        }
    }
}
