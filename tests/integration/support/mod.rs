//! Shared fixtures for the crawl scenarios
//!
//! `MemoryWiki` is an in-memory encyclopedia implementing `PageFetcher`. It
//! counts every article fetch so tests can assert what was (and was not)
//! requested, and can be told to fail, panic or cancel on chosen titles.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use wikifrontier::config::{
    Config, CrawlerConfig, EntryPoints, OutputConfig, RelevanceConfig, SeedConfig, WikiConfig,
};
use wikifrontier::fetcher::{FetchError, FetchedPage, PageFetcher};
use wikifrontier::Title;

/// One stored article
#[derive(Debug, Clone, Default)]
pub struct Article {
    pub text: String,
    pub categories: Vec<String>,
    pub links: Vec<String>,
}

#[derive(Default)]
pub struct MemoryWiki {
    articles: HashMap<String, Article>,
    portal_links: HashMap<String, Vec<String>>,
    members: HashMap<String, Vec<String>>,
    broken: HashSet<String>,
    panics: HashSet<String>,
    cancel_on: Option<(String, CancellationToken)>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl MemoryWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an on-topic article linking to `links`
    pub fn farm_article(mut self, title: &str, links: &[&str]) -> Self {
        self.articles.insert(
            title.to_string(),
            Article {
                text: format!("{} is a farm topic.\n== History ==\nFarm history.", title),
                categories: vec!["Category:Farming".to_string()],
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
        self
    }

    pub fn article(mut self, title: &str, article: Article) -> Self {
        self.articles.insert(title.to_string(), article);
        self
    }

    pub fn portal(mut self, portal: &str, links: &[&str]) -> Self {
        self.portal_links.insert(
            portal.to_string(),
            links.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    pub fn category(mut self, category: &str, members: &[&str]) -> Self {
        self.members.insert(
            category.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    /// Makes fetches of `title` fail with a transport error
    pub fn broken(mut self, title: &str) -> Self {
        self.broken.insert(title.to_string());
        self
    }

    /// Makes fetches of `title` panic
    pub fn panics(mut self, title: &str) -> Self {
        self.panics.insert(title.to_string());
        self
    }

    /// Cancels `token` when `title` is fetched
    pub fn cancel_on(mut self, title: &str, token: CancellationToken) -> Self {
        self.cancel_on = Some((title.to_string(), token));
        self
    }

    /// How many times an article was fetched
    pub fn fetch_count(&self, title: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(title)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl PageFetcher for MemoryWiki {
    async fn fetch_page(&self, title: &Title) -> Result<FetchedPage, FetchError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(title.to_string())
            .or_insert(0) += 1;

        if let Some((trigger, token)) = &self.cancel_on {
            if trigger == title.as_str() {
                token.cancel();
            }
        }

        if self.panics.contains(title.as_str()) {
            panic!("extract parser crashed on {}", title);
        }

        if self.broken.contains(title.as_str()) {
            return Err(FetchError::Transport("connection reset".to_string()));
        }

        let article = self
            .articles
            .get(title.as_str())
            .ok_or_else(|| FetchError::NotFound(title.to_string()))?;

        Ok(FetchedPage::from_extract(
            title.clone(),
            format!("https://wiki.test/wiki/{}", title.as_str().replace(' ', "_")),
            article.text.clone(),
            article.categories.clone(),
            article.links.clone(),
            1,
            1,
        ))
    }

    async fn category_members(
        &self,
        category: &Title,
        limit: usize,
    ) -> Result<Vec<String>, FetchError> {
        self.members
            .get(category.as_str())
            .map(|m| m.iter().take(limit).cloned().collect())
            .ok_or_else(|| FetchError::NotFound(category.to_string()))
    }

    async fn linked_titles(&self, page: &Title, limit: usize) -> Result<Vec<String>, FetchError> {
        self.portal_links
            .get(page.as_str())
            .map(|l| l.iter().take(limit).cloned().collect())
            .ok_or_else(|| FetchError::NotFound(page.to_string()))
    }
}

/// Configuration with the keyword "farm", no pacing delay and output in `dir`
pub fn create_test_config(dir: &Path) -> Config {
    Config {
        wiki: WikiConfig {
            user_agent: "TestBot/1.0 (https://example.com/bot)".to_string(),
            language: "en".to_string(),
            api_url: None,
            request_delay_ms: 0,
            timeout_secs: 5,
            max_retries: 0,
        },
        crawler: CrawlerConfig {
            max_pages_per_category: 100,
            max_links_per_page: 100,
            max_depth: 3,
            max_total_pages: 1000,
            batch_size: 10,
            concurrency: 3,
            filter_portal_links: true,
        },
        relevance: RelevanceConfig {
            keywords: vec!["farm".to_string()],
            anchor_keywords: vec![],
            threshold: 0.5,
            relevant_score: 1.0,
            title_weight: 2.0,
            body_weight: 0.1,
            category_weight: 1.0,
        },
        seeds: SeedConfig::default(),
        output: OutputConfig {
            directory: dir.join("out"),
            basename: "pages".to_string(),
            compress: false,
            database_path: None,
        },
    }
}

pub fn entry_points(portals: &[&str], categories: &[&str]) -> EntryPoints {
    EntryPoints {
        portals: portals.iter().map(|p| Title::parse(p).unwrap()).collect(),
        categories: categories.iter().map(|c| Title::parse(c).unwrap()).collect(),
    }
}

pub fn title(raw: &str) -> Title {
    Title::parse(raw).unwrap()
}
