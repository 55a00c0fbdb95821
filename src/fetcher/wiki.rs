//! MediaWiki action API fetcher
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Page queries (plain-text extract, categories, links, revision id)
//! - Category member listing with continuation
//! - Retry logic for transient failures (transport errors, HTTP 429 and 5xx)

use super::{FetchError, FetchedPage, PageFetcher};
use crate::config::WikiConfig;
use crate::title::Title;
use crate::ConfigError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Largest page size the API accepts for list and prop queries
const API_PAGE_LIMIT: usize = 500;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The remote access configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &WikiConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(rename = "continue", default)]
    continuation: Option<Continuation>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<ApiPage>,
    #[serde(default)]
    categorymembers: Vec<TitleEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    #[serde(default)]
    pageid: u64,
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    categories: Vec<TitleEntry>,
    #[serde(default)]
    links: Vec<TitleEntry>,
    #[serde(default)]
    lastrevid: u64,
}

#[derive(Debug, Deserialize)]
struct TitleEntry {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct Continuation {
    #[serde(default)]
    cmcontinue: Option<String>,
    #[serde(default)]
    plcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

/// Fetcher for a MediaWiki installation
pub struct WikiFetcher {
    client: Client,
    endpoint: Url,
    retry_delay: Duration,
    max_retries: u32,
}

impl WikiFetcher {
    /// Creates a fetcher for the configured endpoint
    pub fn new(config: &WikiConfig) -> crate::Result<Self> {
        let endpoint = Url::parse(&config.endpoint())
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.endpoint(), e)))?;
        let client = build_http_client(config)?;

        Ok(Self::with_client(client, endpoint, config))
    }

    pub fn with_client(client: Client, endpoint: Url, config: &WikiConfig) -> Self {
        Self {
            client,
            endpoint,
            retry_delay: Duration::from_millis(config.request_delay_ms),
            max_retries: config.max_retries,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one API request, retrying transient failures
    async fn query<T: DeserializeOwned>(&self, params: &[(&str, String)]) -> Result<T, FetchError> {
        let mut attempt = 0;

        loop {
            let last_chance = attempt >= self.max_retries;
            let result = self
                .client
                .get(self.endpoint.clone())
                .query(params)
                .send()
                .await;

            let error = match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response
                            .bytes()
                            .await
                            .map_err(|e| FetchError::Transport(e.to_string()))?;
                        return serde_json::from_slice(&body)
                            .map_err(|e| FetchError::Malformed(e.to_string()));
                    }

                    let error = FetchError::Transport(format!("HTTP {}", status.as_u16()));
                    if !is_retryable_status(status) {
                        return Err(error);
                    }
                    error
                }
                Err(e) if e.is_timeout() => FetchError::Timeout,
                Err(e) => FetchError::Transport(e.to_string()),
            };

            if last_chance {
                return Err(error);
            }

            attempt += 1;
            tracing::debug!(
                "Retrying request ({}/{}) after: {}",
                attempt,
                self.max_retries,
                error
            );
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    fn page_url(&self, title: &Title) -> String {
        let path = format!("/wiki/{}", title.as_str().replace(' ', "_"));
        self.endpoint
            .join(&path)
            .map(|u| u.to_string())
            .unwrap_or(path)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn check_api_error(response: &ApiResponse) -> Result<(), FetchError> {
    match &response.error {
        Some(error) => Err(FetchError::Malformed(format!(
            "{}: {}",
            error.code, error.info
        ))),
        None => Ok(()),
    }
}

/// Extracts the single page of a `titles=` query
fn single_page(title: &Title, response: ApiResponse) -> Result<ApiPage, FetchError> {
    check_api_error(&response)?;

    let page = response
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| FetchError::Malformed("response has no pages".to_string()))?;

    if page.missing || page.invalid {
        return Err(FetchError::NotFound(title.to_string()));
    }

    Ok(page)
}

#[async_trait]
impl PageFetcher for WikiFetcher {
    async fn fetch_page(&self, title: &Title) -> Result<FetchedPage, FetchError> {
        let params = [
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("formatversion", "2".to_string()),
            ("prop", "extracts|categories|info|links|revisions".to_string()),
            ("explaintext", "1".to_string()),
            ("exsectionformat", "wiki".to_string()),
            ("inprop", "url".to_string()),
            ("rvprop", "ids".to_string()),
            ("cllimit", "max".to_string()),
            ("pllimit", "max".to_string()),
            ("plnamespace", "0".to_string()),
            ("redirects", "1".to_string()),
            ("titles", title.to_string()),
        ];

        let response: ApiResponse = self.query(&params).await?;
        let page = single_page(title, response)?;

        tracing::trace!("Fetched {} (page id {})", page.title, page.pageid);

        let url = page.fullurl.unwrap_or_else(|| self.page_url(title));
        Ok(FetchedPage::from_extract(
            title.clone(),
            url,
            page.extract.unwrap_or_default(),
            page.categories.into_iter().map(|c| c.title).collect(),
            page.links.into_iter().map(|l| l.title).collect(),
            page.pageid,
            page.lastrevid,
        ))
    }

    async fn category_members(
        &self,
        category: &Title,
        limit: usize,
    ) -> Result<Vec<String>, FetchError> {
        let mut members = Vec::new();
        let mut continuation: Option<String> = None;

        while members.len() < limit {
            let batch = (limit - members.len()).min(API_PAGE_LIMIT);
            let mut params = vec![
                ("action", "query".to_string()),
                ("format", "json".to_string()),
                ("formatversion", "2".to_string()),
                ("list", "categorymembers".to_string()),
                ("cmtitle", category.to_string()),
                ("cmnamespace", "0".to_string()),
                ("cmlimit", batch.to_string()),
            ];
            if let Some(token) = &continuation {
                params.push(("cmcontinue", token.clone()));
            }

            let response: ApiResponse = self.query(&params).await?;
            check_api_error(&response)?;

            let query = response.query.unwrap_or_default();
            members.extend(query.categorymembers.into_iter().map(|m| m.title));

            continuation = response.continuation.and_then(|c| c.cmcontinue);
            if continuation.is_none() {
                break;
            }
        }

        members.truncate(limit);
        Ok(members)
    }

    async fn linked_titles(&self, page: &Title, limit: usize) -> Result<Vec<String>, FetchError> {
        let mut links = Vec::new();
        let mut continuation: Option<String> = None;

        while links.len() < limit {
            let batch = (limit - links.len()).min(API_PAGE_LIMIT);
            let mut params = vec![
                ("action", "query".to_string()),
                ("format", "json".to_string()),
                ("formatversion", "2".to_string()),
                ("prop", "links".to_string()),
                ("plnamespace", "0".to_string()),
                ("pllimit", batch.to_string()),
                ("redirects", "1".to_string()),
                ("titles", page.to_string()),
            ];
            if let Some(token) = &continuation {
                params.push(("plcontinue", token.clone()));
            }

            let response: ApiResponse = self.query(&params).await?;
            let continuation_token = response
                .continuation
                .as_ref()
                .and_then(|c| c.plcontinue.clone());
            let api_page = single_page(page, response)?;
            links.extend(api_page.links.into_iter().map(|l| l.title));

            continuation = continuation_token;
            if continuation.is_none() {
                break;
            }
        }

        links.truncate(limit);
        Ok(links)
    }
}
