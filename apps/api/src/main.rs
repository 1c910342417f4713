mod config;
mod errors;
mod jobs;
mod llm_client;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::aggregator::Aggregator;
use crate::jobs::cache::FreshnessCache;
use crate::jobs::store::JobStore;
use crate::llm_client::LlmClient;
use crate::resume::feedback::{FeedbackGenerator, LlmFeedback, UnconfiguredFeedback};
use crate::resume::vocabulary::SkillVocabulary;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillSync API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the job pipeline
    let aggregator = Aggregator::from_config(&config.scrape)?;
    info!(
        "Job sources: {:?}, ttl {}h, artifact {}",
        aggregator.platforms(),
        config.jobs_ttl.as_secs() / 3600,
        config.jobs_csv_path.display()
    );
    let jobs = FreshnessCache::new(
        JobStore::new(config.jobs_csv_path.clone()),
        aggregator,
        config.jobs_ttl,
    );

    // Load the skill vocabulary; resume analysis answers 404 for every role without it
    let vocabulary = SkillVocabulary::load(&config.skills_csv_path).unwrap_or_else(|e| {
        warn!(
            "Skill vocabulary unavailable at {}: {e}",
            config.skills_csv_path.display()
        );
        SkillVocabulary::default()
    });
    if vocabulary.is_empty() {
        warn!("Skill vocabulary is empty; resume analysis will reject every role");
    }

    // Initialize feedback generator (LLM-backed only when a key is configured)
    let feedback: Arc<dyn FeedbackGenerator> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmFeedback::new(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY is not set; resume feedback is disabled");
            Arc::new(UnconfiguredFeedback)
        }
    };

    let state = AppState::new(jobs, vocabulary, feedback);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
