//! Axum route handlers for the Resume API.

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::resume::document::extract_text;
use crate::resume::feedback::{feedback_for, FeedbackGenerator};
use crate::resume::matcher::{evaluate, extract_skills, MatchReport};
use crate::resume::vocabulary::{RoleSummary, SkillVocabulary};
use crate::state::AppState;

pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleSummary>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub report: MatchReport,
    pub feedback: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: state.vocabulary.roles(),
    })
}

/// POST /api/v1/resumes/analyze
///
/// Multipart form with a `resume` PDF and the target `role`. Scores the resume
/// against the role's expected skills and attaches feedback for the gaps.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut resume: Option<Bytes> = None;
    let mut role = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or("") {
            "role" => {
                role = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid role field: {e}")))?;
            }
            "resume" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let extension = Path::new(&file_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("")
                    .to_lowercase();
                if extension != "pdf" {
                    return Err(AppError::Validation(format!(
                        "resume must be a PDF file, got '{file_name}'"
                    )));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid resume upload: {e}")))?;
                if data.len() > MAX_RESUME_BYTES {
                    return Err(AppError::PayloadTooLarge(format!(
                        "resume exceeds the {} MB limit",
                        MAX_RESUME_BYTES / (1024 * 1024)
                    )));
                }
                resume = Some(data);
            }
            _ => {}
        }
    }

    let role = role.trim();
    if role.is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    let resume = resume.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    let text = extract_text(resume).await;
    let response = analyze(&text, role, &state.vocabulary, state.feedback.as_ref()).await?;

    Ok(Json(response))
}

/// Scores extracted resume text against `role` and gathers feedback.
pub async fn analyze(
    text: &str,
    role: &str,
    vocabulary: &SkillVocabulary,
    feedback: &dyn FeedbackGenerator,
) -> Result<AnalyzeResponse, AppError> {
    let expected = vocabulary
        .skills_for(role)
        .ok_or_else(|| AppError::NotFound(format!("unknown role '{role}'")))?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "could not analyze the resume: no text could be extracted".to_string(),
        ));
    }

    let found = extract_skills(text, &expected.skills);
    let report = evaluate(&expected.role, &found, &expected.skills);
    info!(
        "Resume scored {}/10 for '{}' ({} matched, {} missing)",
        report.score,
        report.role,
        report.matched.len(),
        report.gaps.len()
    );

    let feedback = feedback_for(feedback, text, &report.gaps, &report.role).await;

    Ok(AnalyzeResponse { report, feedback })
}
