use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Wikifrontier
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub wiki: WikiConfig,
    pub crawler: CrawlerConfig,
    pub relevance: RelevanceConfig,
    #[serde(default)]
    pub seeds: SeedConfig,
    pub output: OutputConfig,
}

/// Remote encyclopedia access configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WikiConfig {
    /// User agent identity sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Language edition (e.g. "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Explicit API endpoint; derived from `language` when absent
    #[serde(rename = "api-url", default)]
    pub api_url: Option<String>,

    /// Minimum delay between two fetches issued by the same worker (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Timeout for a single fetch (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries the fetcher performs on transport errors
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,
}

impl WikiConfig {
    /// Returns the MediaWiki action API endpoint
    pub fn endpoint(&self) -> String {
        match &self.api_url {
            Some(url) => url.clone(),
            None => format!("https://{}.wikipedia.org/w/api.php", self.language),
        }
    }
}

/// Crawl frontier bounds
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum members taken from each configured category
    #[serde(rename = "max-pages-per-category", default = "default_max_pages_per_category")]
    pub max_pages_per_category: usize,

    /// Maximum outbound links kept per page (and taken from each portal)
    #[serde(rename = "max-links-per-page", default = "default_max_links_per_page")]
    pub max_links_per_page: usize,

    /// Maximum expansion depth from the entry-point seeds
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Global cap on distinct nodes ever admitted
    #[serde(rename = "max-total-pages", default = "default_max_total_pages")]
    pub max_total_pages: usize,

    /// Candidates dispatched per batch
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of concurrent fetch workers
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Apply the keyword pre-filter to portal links
    #[serde(rename = "filter-portal-links", default = "default_true")]
    pub filter_portal_links: bool,
}

/// Keyword relevance model
#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceConfig {
    /// Topical keywords, matched as lower-case substrings
    pub keywords: Vec<String>,

    /// Keywords that force acceptance when found in a title
    #[serde(rename = "anchor-keywords", default)]
    pub anchor_keywords: Vec<String>,

    /// Minimum score for a page to be kept
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Score above which a page counts as relevant in the statistics
    #[serde(rename = "relevant-score", default = "default_relevant_score")]
    pub relevant_score: f64,

    #[serde(rename = "title-weight", default = "default_title_weight")]
    pub title_weight: f64,

    #[serde(rename = "body-weight", default = "default_body_weight")]
    pub body_weight: f64,

    #[serde(rename = "category-weight", default = "default_category_weight")]
    pub category_weight: f64,
}

/// Entry points the crawl starts from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Portal pages whose outbound links seed the crawl
    #[serde(default)]
    pub portals: Vec<String>,

    /// Categories whose members seed the crawl
    #[serde(default)]
    pub categories: Vec<String>,

    /// Optional file with one portal per line
    #[serde(rename = "portals-file", default)]
    pub portals_file: Option<PathBuf>,

    /// Optional file with one category per line
    #[serde(rename = "categories-file", default)]
    pub categories_file: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives the checkpoint files
    pub directory: PathBuf,

    /// File name stem shared by the checkpoint files
    #[serde(default = "default_basename")]
    pub basename: String,

    /// Gzip the full-detail JSON file
    #[serde(default)]
    pub compress: bool,

    /// Optional SQLite mirror of every checkpoint
    #[serde(rename = "database-path", default)]
    pub database_path: Option<PathBuf>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_request_delay_ms() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_pages_per_category() -> usize {
    500
}

fn default_max_links_per_page() -> usize {
    100
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_total_pages() -> usize {
    10_000
}

fn default_batch_size() -> usize {
    100
}

fn default_concurrency() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    0.5
}

fn default_relevant_score() -> f64 {
    1.0
}

fn default_title_weight() -> f64 {
    2.0
}

fn default_body_weight() -> f64 {
    0.1
}

fn default_category_weight() -> f64 {
    1.0
}

fn default_basename() -> String {
    "pages".to_string()
}

/// Resolved, canonical entry points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPoints {
    pub portals: Vec<crate::Title>,
    pub categories: Vec<crate::Title>,
}

impl EntryPoints {
    pub fn is_empty(&self) -> bool {
        self.portals.is_empty() && self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.portals.len() + self.categories.len()
    }
}
