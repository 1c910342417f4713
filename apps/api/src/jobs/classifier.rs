//! Category Classifier: maps a free-text job title onto the fixed job taxonomy.
//!
//! Matching is ordered: categories are tried in `TAXONOMY` order and the first
//! one with a trigger occurring anywhere in the normalized title wins. Reordering
//! `TAXONOMY` changes results, e.g. "React Native Developer" must reach Mobile
//! before Web, and the generic "developer" trigger of Software Development sits
//! last so specialised titles are not swallowed by it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed job taxonomy. `Other` is the single default for unmatched titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "DevOps")]
    DevOps,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "UI/UX Design")]
    UiUxDesign,
    #[serde(rename = "Quality Assurance")]
    QualityAssurance,
    #[serde(rename = "Database")]
    Database,
    #[serde(rename = "Project Management")]
    ProjectManagement,
    #[serde(rename = "Business Analyst")]
    BusinessAnalyst,
    #[serde(rename = "Digital Marketing")]
    DigitalMarketing,
    #[serde(rename = "Software Development")]
    SoftwareDevelopment,
    #[serde(rename = "Other")]
    Other,
}

pub const DEFAULT_CATEGORY: Category = Category::Other;

/// Declaration order is the tie-break order. Triggers are matched against the
/// normalized title (see `normalize_title`); short acronyms carry surrounding
/// spaces so they only match as whole tokens.
pub const TAXONOMY: &[(Category, &[&str])] = &[
    (
        Category::DataScience,
        &[
            "data scientist",
            "data analyst",
            "machine learning",
            " ml ",
            " ai engineer",
            "data engineer",
            "analytics",
        ],
    ),
    (
        Category::MobileDevelopment,
        &["android", " ios ", "mobile", "flutter", "react native"],
    ),
    (
        Category::WebDevelopment,
        &[
            "web developer",
            "web designer",
            "react",
            "angular",
            "vue",
            "node",
            "django",
            "flask",
            "full stack",
            "fullstack",
            "frontend",
            "backend",
        ],
    ),
    (
        Category::DevOps,
        &[
            "devops",
            "cloud",
            " aws ",
            "azure",
            "kubernetes",
            "docker",
            "infrastructure",
        ],
    ),
    (
        Category::Cybersecurity,
        &["security", "cyber", "infosec", "ethical hacker"],
    ),
    (
        Category::UiUxDesign,
        &["ui/ux", "ui designer", "ux designer", "product designer"],
    ),
    (
        Category::QualityAssurance,
        &[" qa ", " test ", "testing", "tester", "automation"],
    ),
    (Category::Database, &["database", "sql", "mongodb", " dba "]),
    (
        Category::ProjectManagement,
        &["project manager", "product manager", "scrum"],
    ),
    (
        Category::BusinessAnalyst,
        &["business analyst", " ba ", "system analyst"],
    ),
    (
        Category::DigitalMarketing,
        &[
            "digital marketing",
            " seo ",
            " sem ",
            "search engine",
            "social media",
        ],
    ),
    (
        Category::SoftwareDevelopment,
        &["software", "developer", "programmer", " sde ", "coding"],
    ),
];

/// Returns the first category whose trigger occurs in `title`, else `Other`.
/// Pure and total.
pub fn classify(title: &str) -> Category {
    let title = normalize_title(title);
    TAXONOMY
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| title.contains(t)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Lowercase, every character other than alphanumerics and `/` turned into a
/// space, whitespace collapsed, padded with one space on each side.
fn normalize_title(title: &str) -> String {
    let spaced: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '/' { c } else { ' ' })
        .collect();
    let words: Vec<&str> = spaced.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::DataScience => "Data Science",
            Category::MobileDevelopment => "Mobile Development",
            Category::WebDevelopment => "Web Development",
            Category::DevOps => "DevOps",
            Category::Cybersecurity => "Cybersecurity",
            Category::UiUxDesign => "UI/UX Design",
            Category::QualityAssurance => "Quality Assurance",
            Category::Database => "Database",
            Category::ProjectManagement => "Project Management",
            Category::BusinessAnalyst => "Business Analyst",
            Category::DigitalMarketing => "Digital Marketing",
            Category::SoftwareDevelopment => "Software Development",
            Category::Other => "Other",
        }
    }

    /// Every category including the default, in match order.
    pub fn all() -> impl Iterator<Item = Category> {
        TAXONOMY
            .iter()
            .map(|(c, _)| *c)
            .chain(std::iter::once(DEFAULT_CATEGORY))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::all()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_react_frontend_is_web_development() {
        assert_eq!(
            classify("Senior React Frontend Developer"),
            Category::WebDevelopment
        );
    }

    #[test]
    fn test_dba_is_database() {
        assert_eq!(classify("Experienced DBA"), Category::Database);
    }

    #[test]
    fn test_unmatched_title_is_default() {
        assert_eq!(classify("Chief Happiness Officer"), Category::Other);
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn test_first_category_in_order_wins() {
        // Matches Mobile ("react native") and Web ("react"); Mobile is declared first.
        assert_eq!(classify("React Native Developer"), Category::MobileDevelopment);
        // Matches Data Science and Software Development ("developer").
        assert_eq!(
            classify("Machine Learning Developer"),
            Category::DataScience
        );
    }

    #[test]
    fn test_generic_developer_is_software_development() {
        assert_eq!(classify("Java Developer"), Category::SoftwareDevelopment);
        assert_eq!(classify("SDE Intern"), Category::SoftwareDevelopment);
    }

    #[test]
    fn test_short_triggers_only_match_whole_tokens() {
        assert_eq!(
            classify("Java Developer - Bangalore"),
            Category::SoftwareDevelopment
        );
        assert_eq!(
            classify("Global Software Engineer"),
            Category::SoftwareDevelopment
        );
        assert_eq!(classify("ABAP Developer"), Category::SoftwareDevelopment);
        assert_eq!(classify("Semiconductor Programmer"), Category::SoftwareDevelopment);
        assert_eq!(classify("Studios Game Developer"), Category::SoftwareDevelopment);
    }

    #[test]
    fn test_acronym_triggers_match_as_tokens() {
        assert_eq!(classify("BA Intern"), Category::BusinessAnalyst);
        assert_eq!(classify("SEM & SEO Executive"), Category::DigitalMarketing);
        assert_eq!(classify("iOS Developer"), Category::MobileDevelopment);
        assert_eq!(classify("QA Engineer (Manual)"), Category::QualityAssurance);
        assert_eq!(classify("Full-Stack Developer"), Category::WebDevelopment);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("DEVOPS ENGINEER"), Category::DevOps);
        assert_eq!(classify("devops engineer"), Category::DevOps);
    }

    #[test]
    fn test_deterministic() {
        let title = "Full Stack Engineer (Django)";
        let first = classify(title);
        for _ in 0..10 {
            assert_eq!(classify(title), first);
        }
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for category in Category::all() {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
        assert!("Astronomy".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::UiUxDesign).unwrap();
        assert_eq!(json, r#""UI/UX Design""#);
    }
}
