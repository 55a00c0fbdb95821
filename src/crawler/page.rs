use crate::fetcher::{FetchedPage, PageSection};
use crate::title::Title;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An accepted page, as stored in the result set and every checkpoint
///
/// Built once from a fetched page and never modified afterwards; all fields
/// are private and exposed through getters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    title: Title,
    url: String,
    summary: String,
    full_text: String,
    sections: Vec<PageSection>,
    categories: Vec<String>,
    links: Vec<Title>,
    word_count: usize,
    page_id: u64,
    last_modified: String,
    scraped_at: DateTime<Utc>,
    #[serde(default)]
    relevance_score: f64,
    /// Expansion depth the page was admitted at
    #[serde(default)]
    depth: u32,
}

impl ScrapedPage {
    /// Creates the stored record for a fetched page
    ///
    /// # Arguments
    ///
    /// * `page` - The page returned by the fetcher
    /// * `max_links` - Cap on the number of outbound links kept
    /// * `relevance_score` - The score the page was accepted with
    /// * `scraped_at` - Creation timestamp
    ///
    /// Links that are not valid titles are dropped, duplicates collapse to
    /// their first occurrence, and the cap applies after both.
    pub fn from_fetched(
        page: FetchedPage,
        max_links: usize,
        relevance_score: f64,
        scraped_at: DateTime<Utc>,
    ) -> Self {
        let word_count = page.word_count();

        let mut links: Vec<Title> = Vec::new();
        for raw in &page.links {
            if links.len() >= max_links {
                break;
            }
            match Title::parse(raw) {
                Ok(link) if !links.contains(&link) => links.push(link),
                Ok(_) => {}
                Err(e) => tracing::debug!("Dropping link '{}' from {}: {}", raw, page.title, e),
            }
        }

        Self {
            title: page.title,
            url: page.url,
            summary: page.summary,
            full_text: page.text,
            sections: page.sections,
            categories: page.categories,
            links,
            word_count,
            page_id: page.page_id,
            last_modified: page.revision_id.to_string(),
            scraped_at,
            relevance_score,
            depth: 0,
        }
    }

    /// Records the depth the page was admitted at
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn sections(&self) -> &[PageSection] {
        &self.sections
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Outbound links, canonicalized and capped
    pub fn links(&self) -> &[Title] {
        &self.links
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn page_id(&self) -> u64 {
        self.page_id
    }

    /// Revision id of the fetched text
    pub fn last_modified(&self) -> &str {
        &self.last_modified
    }

    pub fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }

    pub fn relevance_score(&self) -> f64 {
        self.relevance_score
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}
