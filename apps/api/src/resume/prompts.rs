// LLM prompt constants for resume feedback.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const FEEDBACK_SYSTEM: &str = "You are an experienced technical recruiter and resume coach. \
    You give short, concrete, actionable advice. \
    You never invent experience the candidate does not have.";

/// Replace `{role}`, `{gaps}`, `{resume_text}` and `{format}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"A candidate is applying for the role of "{role}".

Their resume is missing these skills expected for the role:
{gaps}

Resume text:
"""
{resume_text}
"""

Suggest how the candidate could close each gap: projects to build, courses or certifications to take, or how to surface related experience already present in the resume. Keep each suggestion to one sentence.

{format}"#;

/// Upper bound on resume characters sent to the model.
pub const MAX_RESUME_CHARS: usize = 12_000;
