use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::jobs::cache::DEFAULT_TTL;
use crate::jobs::models::Platform;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub jobs_csv_path: PathBuf,
    pub jobs_ttl: Duration,
    pub scrape: ScrapeConfig,
    pub skills_csv_path: PathBuf,
    /// Missing key means feedback degrades to an explanatory line.
    pub anthropic_api_key: Option<String>,
}

/// Scraping knobs shared by every source adapter.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Registry selection, in aggregation order.
    pub sources: Vec<SourceConfig>,
    pub page_delay: Duration,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub platform: Platform,
    pub pages: u32,
}

impl SourceConfig {
    /// Page range `1..=pages` handed to the adapter.
    pub fn page_range(&self) -> Vec<u32> {
        (1..=self.pages).collect()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ttl_hours: u64 = env_or("JOBS_TTL_HOURS", DEFAULT_TTL.as_secs() / 3600)?;

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            jobs_csv_path: std::env::var("JOBS_CSV_PATH")
                .unwrap_or_else(|_| "data/cleaned_job_data.csv".to_string())
                .into(),
            jobs_ttl: Duration::from_secs(ttl_hours * 3600),
            scrape: ScrapeConfig {
                sources: parse_sources(
                    &std::env::var("JOB_SOURCES")
                        .unwrap_or_else(|_| "internshala,freshersworld".to_string()),
                    env_or("INTERNSHALA_PAGES", 5)?,
                    env_or("FRESHERSWORLD_PAGES", 3)?,
                )?,
                page_delay: Duration::from_millis(env_or("SCRAPE_DELAY_MS", 1000)?),
                request_timeout: Duration::from_secs(env_or("SCRAPE_TIMEOUT_SECS", 10)?),
            },
            skills_csv_path: std::env::var("SKILLS_CSV_PATH")
                .unwrap_or_else(|_| "data/skills_data.csv".to_string())
                .into(),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Parses the ordered `JOB_SOURCES` list. Duplicates keep their first position.
fn parse_sources(raw: &str, internshala_pages: u32, freshersworld_pages: u32) -> Result<Vec<SourceConfig>> {
    let mut sources: Vec<SourceConfig> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let platform: Platform = name
            .parse()
            .with_context(|| format!("JOB_SOURCES contains an unknown source '{name}'"))?;
        if sources.iter().any(|s| s.platform == platform) {
            continue;
        }
        let pages = match platform {
            Platform::Internshala => internshala_pages,
            Platform::FreshersWorld => freshersworld_pages,
        };
        sources.push(SourceConfig { platform, pages });
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources_preserves_declaration_order() {
        let sources = parse_sources("freshersworld, internshala", 5, 3).unwrap();
        assert_eq!(sources[0].platform, Platform::FreshersWorld);
        assert_eq!(sources[0].pages, 3);
        assert_eq!(sources[1].platform, Platform::Internshala);
        assert_eq!(sources[1].pages, 5);
    }

    #[test]
    fn test_parse_sources_skips_duplicates_and_blanks() {
        let sources = parse_sources("internshala,,Internshala", 2, 1).unwrap();
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_parse_sources_rejects_unknown() {
        assert!(parse_sources("linkedin", 1, 1).is_err());
    }

    #[test]
    fn test_page_range_is_one_based_inclusive() {
        let source = SourceConfig {
            platform: Platform::Internshala,
            pages: 3,
        };
        assert_eq!(source.page_range(), vec![1, 2, 3]);
        let none = SourceConfig {
            platform: Platform::Internshala,
            pages: 0,
        };
        assert!(none.page_range().is_empty());
    }
}
