use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::jobs::classifier::{classify, Category};

pub const DEFAULT_LOCATION: &str = "Not specified";
pub const DEFAULT_SALARY: &str = "Not disclosed";

/// Upstream career portal a listing was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Internshala,
    FreshersWorld,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Internshala => "Internshala",
            Platform::FreshersWorld => "FreshersWorld",
        }
    }

    /// Internshala lists entry-level roles, so an absent experience means a fresher.
    pub fn default_experience(&self) -> &'static str {
        match self {
            Platform::Internshala => "Fresher",
            Platform::FreshersWorld => "Not specified",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown platform '{0}'")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internshala" => Ok(Platform::Internshala),
            "freshersworld" => Ok(Platform::FreshersWorld),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// One discovered listing in canonical shape. Every field is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub source: Platform,
    pub title: String,
    pub company: String,
    pub location: String,
    pub category: Category,
    pub salary: String,
    pub experience_level: String,
    pub apply_url: String,
}

/// Fields as pulled out of one listing container, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub experience: Option<String>,
    pub apply_url: Option<String>,
}

/// Single record-construction step: applies every field default and derives the
/// category. Returns `None` when the title is blank.
pub fn normalize(source: Platform, raw: RawListing) -> Option<JobRecord> {
    let title = clean(raw.title)?;
    let category = classify(&title);

    Some(JobRecord {
        source,
        category,
        company: clean(raw.company).unwrap_or_default(),
        location: clean(raw.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        salary: clean(raw.salary).unwrap_or_else(|| DEFAULT_SALARY.to_string()),
        experience_level: clean(raw.experience)
            .unwrap_or_else(|| source.default_experience().to_string()),
        apply_url: clean(raw.apply_url).unwrap_or_default(),
        title,
    })
}

/// Collapses internal whitespace runs (markup text is full of newlines) and maps
/// blank strings to `None`.
pub fn clean(value: Option<String>) -> Option<String> {
    let value = value?;
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Ordered set of job records, replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTable {
    pub records: Vec<JobRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStats {
    pub total_jobs: usize,
    pub categories: usize,
    pub companies: usize,
}

impl JobTable {
    pub fn new(records: Vec<JobRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact-match filtering on category and experience; `None` means no constraint.
    pub fn filter(&self, category: Option<Category>, experience: Option<&str>) -> Vec<&JobRecord> {
        self.records
            .iter()
            .filter(|r| category.map_or(true, |c| r.category == c))
            .filter(|r| experience.map_or(true, |e| r.experience_level == e))
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.category) {
                seen.push(record.category);
            }
        }
        seen
    }

    /// Distinct experience values, sorted.
    pub fn experience_levels(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.experience_level.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            total_jobs: self.len(),
            categories: self.categories().len(),
            companies: self
                .records
                .iter()
                .map(|r| r.company.as_str())
                .collect::<BTreeSet<_>>()
                .len(),
        }
    }

    pub fn count_by_source(&self, source: Platform) -> usize {
        self.records.iter().filter(|r| r.source == source).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str) -> RawListing {
        RawListing {
            title: Some(title.to_string()),
            ..RawListing::default()
        }
    }

    #[test]
    fn test_normalize_drops_blank_title() {
        assert!(normalize(Platform::Internshala, raw("   \n ")).is_none());
        assert!(normalize(Platform::Internshala, RawListing::default()).is_none());
    }

    #[test]
    fn test_normalize_applies_defaults() {
        let record = normalize(Platform::FreshersWorld, raw("Java Developer")).unwrap();
        assert_eq!(record.company, "");
        assert_eq!(record.location, DEFAULT_LOCATION);
        assert_eq!(record.salary, DEFAULT_SALARY);
        assert_eq!(record.experience_level, "Not specified");
        assert_eq!(record.apply_url, "");
        assert_eq!(record.source, Platform::FreshersWorld);
    }

    #[test]
    fn test_normalize_internshala_defaults_to_fresher() {
        let record = normalize(Platform::Internshala, raw("Java Developer")).unwrap();
        assert_eq!(record.experience_level, "Fresher");
    }

    #[test]
    fn test_normalize_collapses_whitespace_and_classifies() {
        let mut listing = raw("  Senior   React\n Frontend Developer ");
        listing.company = Some("\n  Acme Labs \n".to_string());
        let record = normalize(Platform::Internshala, listing).unwrap();
        assert_eq!(record.title, "Senior React Frontend Developer");
        assert_eq!(record.company, "Acme Labs");
        assert_eq!(record.category, Category::WebDevelopment);
    }

    #[test]
    fn test_blank_optional_field_falls_back_to_default() {
        let mut listing = raw("Tester");
        listing.salary = Some("  ".to_string());
        let record = normalize(Platform::FreshersWorld, listing).unwrap();
        assert_eq!(record.salary, DEFAULT_SALARY);
    }

    #[test]
    fn test_platform_from_str_is_case_insensitive() {
        assert_eq!("FreshersWorld".parse::<Platform>().unwrap(), Platform::FreshersWorld);
        assert_eq!(" internshala ".parse::<Platform>().unwrap(), Platform::Internshala);
        assert!("naukri".parse::<Platform>().is_err());
    }

    #[test]
    fn test_filter_and_stats() {
        let table = JobTable::new(vec![
            normalize(Platform::Internshala, raw("React Developer")).unwrap(),
            normalize(Platform::FreshersWorld, raw("SQL DBA")).unwrap(),
            normalize(Platform::FreshersWorld, raw("Angular Engineer")).unwrap(),
        ]);

        assert_eq!(table.filter(Some(Category::WebDevelopment), None).len(), 2);
        assert_eq!(table.filter(None, Some("Fresher")).len(), 1);
        assert_eq!(
            table
                .filter(Some(Category::WebDevelopment), Some("Not specified"))
                .len(),
            1
        );
        assert_eq!(table.filter(None, None).len(), 3);

        let stats = table.stats();
        assert_eq!(stats.total_jobs, 3);
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.companies, 1);
        assert_eq!(table.count_by_source(Platform::FreshersWorld), 2);
        assert_eq!(table.experience_levels(), vec!["Fresher", "Not specified"]);
    }
}
