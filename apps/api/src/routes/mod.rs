pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted resume.
const UPLOAD_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/refresh", post(jobs::handle_refresh_jobs))
        .route("/api/v1/jobs/filters", get(jobs::handle_job_filters))
        // Resume API
        .route("/api/v1/roles", get(resume::handle_list_roles))
        .route(
            "/api/v1/resumes/analyze",
            post(resume::handle_analyze_resume).layer(DefaultBodyLimit::max(
                resume::MAX_RESUME_BYTES + UPLOAD_OVERHEAD_BYTES,
            )),
        )
        .with_state(state)
}
