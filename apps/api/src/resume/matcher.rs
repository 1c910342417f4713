//! Keyword hits of a document against a role's expected skills, and the bounded
//! 0–10 match score.

use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub role: String,
    /// 0.0 – 10.0, two decimals.
    pub score: f64,
    pub matched: BTreeSet<String>,
    pub gaps: BTreeSet<String>,
}

/// Punctuation that is part of skill names such as `C++` and `C#`.
const KEPT_PUNCTUATION: &[char] = &['+', '#'];

/// Lowercases, strips ASCII punctuation other than `+` and `#`, and collapses
/// whitespace.
pub fn preprocess_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation() || KEPT_PUNCTUATION.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Skills whose preprocessed form occurs in the preprocessed text as a whole
/// word or phrase. Returned in their vocabulary spelling.
pub fn extract_skills(text: &str, skills: &BTreeSet<String>) -> BTreeSet<String> {
    let haystack = format!(" {} ", preprocess_text(text));
    skills
        .iter()
        .filter(|skill| {
            let needle = preprocess_text(skill);
            !needle.is_empty() && haystack.contains(&format!(" {needle} "))
        })
        .cloned()
        .collect()
}

pub fn evaluate(role: &str, found: &BTreeSet<String>, expected: &BTreeSet<String>) -> MatchReport {
    let matched: BTreeSet<String> = found.intersection(expected).cloned().collect();
    let gaps: BTreeSet<String> = expected.difference(&matched).cloned().collect();

    let score = if expected.is_empty() {
        0.0
    } else {
        let raw = matched.len() as f64 / expected.len() as f64 * 10.0;
        (raw * 100.0).round() / 100.0
    };

    MatchReport {
        role: role.to_string(),
        score,
        matched,
        gaps,
    }
}
