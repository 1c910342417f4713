// Resume scoring: a role's expected skills from the vocabulary, keyword hits in
// the uploaded document, a 0–10 score and feedback for what is missing.

pub mod document;
pub mod feedback;
pub mod handlers;
pub mod matcher;
pub mod prompts;
pub mod vocabulary;
