//! Remote page source
//!
//! The crawler only talks to the content graph through the [`PageFetcher`]
//! trait:
//! - `fetch_page` returns the full text, categories, outbound links and
//!   revision metadata of one article
//! - `category_members` lists the articles filed under a category
//! - `linked_titles` lists the outbound article links of any page (used for
//!   portals, which are not scraped themselves)
//!
//! [`WikiFetcher`] implements it against the MediaWiki action API.

mod types;
mod wiki;

pub use types::{count_words, split_sections, FetchedPage, PageSection};
pub use wiki::{build_http_client, WikiFetcher};

use crate::title::Title;
use async_trait::async_trait;
use thiserror::Error;

/// Per-request fetch failures
///
/// None of these abort a crawl; the scheduler records the node as failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("page does not exist: {0}")]
    NotFound(String),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("fetch task failed: {0}")]
    Panicked(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Source of pages and graph edges
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one article with everything the crawler stores about it
    async fn fetch_page(&self, title: &Title) -> Result<FetchedPage, FetchError>;

    /// Lists up to `limit` article titles filed under `category`
    async fn category_members(
        &self,
        category: &Title,
        limit: usize,
    ) -> Result<Vec<String>, FetchError>;

    /// Lists up to `limit` article titles linked from `page`
    async fn linked_titles(&self, page: &Title, limit: usize) -> Result<Vec<String>, FetchError>;
}
