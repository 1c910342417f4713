//! Improvement feedback for the skills a resume is missing.
//!
//! `AppState` holds an `Arc<dyn FeedbackGenerator>`: `LlmFeedback` when an
//! Anthropic key is configured, `UnconfiguredFeedback` otherwise. Neither fails
//! the request; an unavailable generator degrades to a single explanatory line.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::warn;

use crate::llm_client::prompts::BULLET_LINES_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::resume::prompts::{FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM, MAX_RESUME_CHARS};

pub const ALIGNED_FEEDBACK: &str = "No major skill gaps found. Your resume is strongly aligned with this role.";

#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn generate_feedback(
        &self,
        resume_text: &str,
        gaps: &BTreeSet<String>,
        role: &str,
    ) -> Vec<String>;
}

/// Feedback for a report: the aligned line when nothing is missing, otherwise
/// whatever the generator produces.
pub async fn feedback_for(
    generator: &dyn FeedbackGenerator,
    resume_text: &str,
    gaps: &BTreeSet<String>,
    role: &str,
) -> Vec<String> {
    if gaps.is_empty() {
        return vec![ALIGNED_FEEDBACK.to_string()];
    }
    generator.generate_feedback(resume_text, gaps, role).await
}

// ────────────────────────────────────────────────────────────────────────────
// LlmFeedback
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmFeedback {
    llm: LlmClient,
}

impl LlmFeedback {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl FeedbackGenerator for LlmFeedback {
    async fn generate_feedback(
        &self,
        resume_text: &str,
        gaps: &BTreeSet<String>,
        role: &str,
    ) -> Vec<String> {
        let prompt = build_prompt(resume_text, gaps, role);

        match self.llm.call_text(&prompt, FEEDBACK_SYSTEM).await {
            Ok(text) => {
                let lines = split_lines(&text);
                if lines.is_empty() {
                    vec![text]
                } else {
                    lines
                }
            }
            Err(e) => {
                warn!("Feedback generation failed for role '{role}': {e}");
                vec![format!(
                    "AI feedback is unavailable right now ({e}). Focus on the missing skills listed above."
                )]
            }
        }
    }
}

fn build_prompt(resume_text: &str, gaps: &BTreeSet<String>, role: &str) -> String {
    let gaps = gaps
        .iter()
        .map(|g| format!("- {g}"))
        .collect::<Vec<_>>()
        .join("\n");
    let resume_text: String = resume_text.chars().take(MAX_RESUME_CHARS).collect();

    FEEDBACK_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{gaps}", &gaps)
        .replace("{resume_text}", &resume_text)
        .replace("{format}", BULLET_LINES_INSTRUCTION)
}

/// Non-empty reply lines with list markers removed.
fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(&['-', '*', '•'][..]).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// UnconfiguredFeedback
// ────────────────────────────────────────────────────────────────────────────

/// Used when no `ANTHROPIC_API_KEY` is set.
pub struct UnconfiguredFeedback;

#[async_trait]
impl FeedbackGenerator for UnconfiguredFeedback {
    async fn generate_feedback(
        &self,
        _resume_text: &str,
        _gaps: &BTreeSet<String>,
        _role: &str,
    ) -> Vec<String> {
        vec!["AI feedback is not configured (ANTHROPIC_API_KEY is not set). Focus on the missing skills listed above.".to_string()]
    }
}
