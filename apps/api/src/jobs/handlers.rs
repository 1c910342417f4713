//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::aggregator::SourceContribution;
use crate::jobs::cache::{CacheStatus, CachedJobs};
use crate::jobs::classifier::Category;
use crate::jobs::models::{JobRecord, Platform, TableStats};
use crate::state::AppState;

/// Filter value meaning "no constraint".
const ALL: &str = "All";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    pub category: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceCount {
    pub platform: Platform,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub status: CacheStatus,
    pub last_updated: Option<String>,
    /// Computed over the unfiltered table.
    pub stats: TableStats,
    pub sources: Vec<SourceCount>,
    pub count: usize,
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: CacheStatus,
    pub last_updated: Option<String>,
    pub total_jobs: usize,
    pub contributions: Vec<SourceContribution>,
}

#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub categories: Vec<Category>,
    pub experience_levels: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
///
/// Serves the persisted table while fresh, scraping first when it is stale or
/// absent. `category` and `experience` narrow the rows by exact match.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<JobsResponse>, AppError> {
    let category = parse_category(query.category.as_deref())?;
    let experience = filter_value(query.experience.as_deref());

    let cached = load_jobs(&state).await?;

    let sources = state
        .jobs
        .platforms()
        .into_iter()
        .map(|platform| SourceCount {
            platform,
            count: cached.table.count_by_source(platform),
        })
        .collect();

    let jobs: Vec<JobRecord> = cached
        .table
        .filter(category, experience)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(JobsResponse {
        status: cached.status,
        last_updated: format_time(cached.last_updated),
        stats: cached.table.stats(),
        sources,
        count: jobs.len(),
        jobs,
    }))
}

/// POST /api/v1/jobs/refresh
///
/// Scrapes every source regardless of freshness. When nothing comes back the
/// previous table stays in place and is reported as a stale fallback.
pub async fn handle_refresh_jobs(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    let cached = {
        let _guard = state.jobs_lock.lock().await;
        state.jobs.refresh().await?
    };

    info!(
        "Manual refresh finished: status={:?}, total={}",
        cached.status,
        cached.table.len()
    );

    Ok(Json(RefreshResponse {
        status: cached.status,
        last_updated: format_time(cached.last_updated),
        total_jobs: cached.table.len(),
        contributions: cached.contributions,
    }))
}

/// GET /api/v1/jobs/filters
pub async fn handle_job_filters(
    State(state): State<AppState>,
) -> Result<Json<FiltersResponse>, AppError> {
    let cached = load_jobs(&state).await?;

    Ok(Json(FiltersResponse {
        categories: cached.table.categories(),
        experience_levels: cached.table.experience_levels(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_jobs(state: &AppState) -> Result<CachedJobs, AppError> {
    let _guard = state.jobs_lock.lock().await;
    Ok(state.jobs.load().await?)
}

fn filter_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, AppError> {
    filter_value(raw)
        .map(|v| v.parse::<Category>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn format_time(time: Option<DateTime<Utc>>) -> Option<String> {
    time.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}
