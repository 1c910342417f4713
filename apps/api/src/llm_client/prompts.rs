// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Output-shape instruction appended to prompts whose reply is split into lines.
pub const BULLET_LINES_INSTRUCTION: &str = "\
    Respond with one bullet point per line, each starting with '- '. \
    Do NOT use headings, tables, or code fences. \
    Do NOT include an introduction or a closing remark.";
