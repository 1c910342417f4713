//! FreshersWorld IT/software listings. Page 1 is the bare category URL; later
//! pages use a limit/offset query.

use scraper::{ElementRef, Html, Selector};

use super::{element_text, first_text, select_all, ParsedPage, SourceAdapter};
use crate::jobs::models::{clean, Platform, RawListing};

pub const DEFAULT_BASE_URL: &str = "https://www.freshersworld.com";
const LISTING_PATH: &str = "/jobs/category/it-software-job-vacancies";
const PAGE_SIZE: u32 = 20;

const CONTAINERS: &[&str] = &["div.job-container", "div[job_id]"];
const TITLE: &[&str] = &["span.wrap-title", "span.seo_title"];
const COMPANY: &[&str] = &["h3.latest-jobs-title", ".company-name"];
const LOCATION: &[&str] = &["span.job-location a", "span.job-location"];
const EXPERIENCE: &[&str] = &["span.experience", ".experience"];
const SALARY: &[&str] = &["span.qualifications", "span.salary"];

/// Markers that tell a salary span apart from the other `qualifications` spans.
const SALARY_MARKERS: &[&str] = &["Monthly", "Yearly", "-"];
const JOB_LINK_MARKER: &str = "freshersworld.com/jobs/";

pub struct FreshersWorldAdapter {
    base_url: String,
}

impl FreshersWorldAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn parse_container(&self, card: ElementRef<'_>) -> RawListing {
        RawListing {
            title: first_text(card, TITLE),
            company: first_text(card, COMPANY),
            location: first_text(card, LOCATION),
            experience: first_text(card, EXPERIENCE),
            salary: salary(card),
            apply_url: job_link(card),
        }
    }
}

/// First span that reads like a salary, trying each selector in turn so a card
/// whose `qualifications` spans hold only degrees still reaches `span.salary`.
fn salary(card: ElementRef<'_>) -> Option<String> {
    SALARY.iter().find_map(|candidate| {
        let selector = Selector::parse(candidate).ok()?;
        card.select(&selector)
            .map(element_text)
            .find(|text| SALARY_MARKERS.iter().any(|m| text.contains(m)))
    })
}

/// First anchor pointing at a job page, else the card's own display URL.
fn job_link(card: ElementRef<'_>) -> Option<String> {
    let from_anchor = Selector::parse("a[href]").ok().and_then(|selector| {
        card.select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| href.contains(JOB_LINK_MARKER))
            .map(str::to_string)
    });

    from_anchor.or_else(|| clean(card.value().attr("job_display_url").map(str::to_string)))
}

impl Default for FreshersWorldAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SourceAdapter for FreshersWorldAdapter {
    fn platform(&self) -> Platform {
        Platform::FreshersWorld
    }

    fn page_url(&self, page: u32) -> String {
        let base = format!("{}{LISTING_PATH}", self.base_url);
        if page <= 1 {
            base
        } else {
            let offset = (page - 1) * PAGE_SIZE;
            format!("{base}?&limit={PAGE_SIZE}&offset={offset}")
        }
    }

    fn referer(&self) -> Option<String> {
        Some(format!("{}/", self.base_url))
    }

    fn parse_page(&self, html: &str) -> ParsedPage {
        let document = Html::parse_document(html);
        let cards = select_all(document.root_element(), CONTAINERS);

        ParsedPage {
            containers: cards.len(),
            listings: cards
                .into_iter()
                .map(|card| self.parse_container(card))
                .collect(),
        }
    }
}
