//! Internshala IT job listings. Pagination is a `page-{n}` path segment.

use scraper::{ElementRef, Html};

use super::{element_text, first_text, select_all, ParsedPage, SourceAdapter};
use crate::jobs::models::{clean, Platform, RawListing};

pub const DEFAULT_BASE_URL: &str = "https://internshala.com";
const LISTING_PATH: &str = "/jobs/information-technology-jobs";

const CONTAINERS: &[&str] = &["div.individual_internship", "div[internshipid]"];
const TITLE: &[&str] = &["a.job-title-href", ".job-internship-name a"];
const COMPANY: &[&str] = &["p.company-name", ".company_name"];
const LOCATION: &[&str] = &["div.locations", ".location_link"];
const SALARY: &[&str] = &["span.mobile", ".salary .desktop"];
const EXPERIENCE: &[&str] = &[".row-1-item span", ".experience span"];

pub struct InternshalaAdapter {
    base_url: String,
}

impl InternshalaAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn parse_container(&self, card: ElementRef<'_>) -> RawListing {
        let title_link = select_all(card, TITLE).into_iter().next();

        RawListing {
            title: title_link.map(element_text),
            company: first_text(card, COMPANY),
            location: first_text(card, LOCATION),
            salary: first_text(card, SALARY),
            // The experience badge is the last span of the first row.
            experience: select_all(card, EXPERIENCE)
                .into_iter()
                .rev()
                .find_map(|span| clean(Some(element_text(span)))),
            apply_url: title_link
                .and_then(|a| a.value().attr("href"))
                .or_else(|| card.value().attr("data-href"))
                .map(|href| self.absolute(href)),
        }
    }

    fn absolute(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}/{}", self.base_url, href.trim_start_matches('/'))
        }
    }
}

impl Default for InternshalaAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SourceAdapter for InternshalaAdapter {
    fn platform(&self) -> Platform {
        Platform::Internshala
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}{LISTING_PATH}/page-{page}", self.base_url)
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
