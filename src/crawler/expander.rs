//! Frontier expansion
//!
//! Two sources feed the frontier:
//! - entry points (portal links and category members), admitted at depth 0
//! - outbound links of accepted pages, admitted one level deeper than the
//!   page they were found on
//!
//! Every candidate goes through [`VisitedRegistry::claim`]; anything the
//! registry refuses is dropped on the spot.

use super::page::ScrapedPage;
use crate::config::{CrawlerConfig, EntryPoints};
use crate::fetcher::PageFetcher;
use crate::relevance::RelevanceScorer;
use crate::state::{ClaimOutcome, VisitedRegistry};
use crate::title::Title;
use std::sync::Arc;

/// A claimed node waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: Title,
    /// Expansion distance from the entry point that led here
    pub depth: u32,
}

/// Produces new candidates and claims them in the registry
pub struct FrontierExpander {
    fetcher: Arc<dyn PageFetcher>,
    registry: Arc<VisitedRegistry>,
    scorer: Arc<RelevanceScorer>,
    max_depth: u32,
    max_links_per_page: usize,
    max_pages_per_category: usize,
    filter_portal_links: bool,
}

/// Whether expansion can keep admitting
enum Admission {
    Continue,
    Full,
}

impl FrontierExpander {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        registry: Arc<VisitedRegistry>,
        scorer: Arc<RelevanceScorer>,
        config: &CrawlerConfig,
    ) -> Self {
        Self {
            fetcher,
            registry,
            scorer,
            max_depth: config.max_depth,
            max_links_per_page: config.max_links_per_page,
            max_pages_per_category: config.max_pages_per_category,
            filter_portal_links: config.filter_portal_links,
        }
    }

    /// Canonicalizes a raw title and claims it
    fn admit(&self, raw: &str, depth: u32, out: &mut Vec<Candidate>) -> Admission {
        let title = match Title::parse(raw) {
            Ok(title) => title,
            Err(e) => {
                tracing::debug!("Skipping candidate '{}': {}", raw, e);
                return Admission::Continue;
            }
        };

        self.admit_title(title, depth, out)
    }

    fn admit_title(&self, title: Title, depth: u32, out: &mut Vec<Candidate>) -> Admission {
        match self.registry.claim(&title) {
            ClaimOutcome::Claimed => {
                tracing::trace!("Claimed {} at depth {}", title, depth);
                out.push(Candidate { title, depth });
                Admission::Continue
            }
            ClaimOutcome::AlreadySeen(state) => {
                tracing::trace!("Dropping {} (already {})", title, state);
                Admission::Continue
            }
            ClaimOutcome::AtCapacity => {
                tracing::debug!(
                    "Page cap of {} reached, dropping {}",
                    self.registry.max_total(),
                    title
                );
                Admission::Full
            }
        }
    }

    /// Resolves every configured portal and category into depth-0 candidates
    ///
    /// A portal or category that cannot be listed is logged and skipped. The
    /// portal and category pages themselves are never claimed.
    pub async fn expand_entry_points(&self, entry_points: &EntryPoints) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for portal in &entry_points.portals {
            let links = match self
                .fetcher
                .linked_titles(portal, self.max_links_per_page)
                .await
            {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!("Could not list links of {}: {}", portal, e);
                    continue;
                }
            };

            let before = candidates.len();
            for link in &links {
                if self.filter_portal_links && !self.scorer.is_candidate_title(link) {
                    continue;
                }
                if let Admission::Full = self.admit(link, 0, &mut candidates) {
                    return candidates;
                }
            }
            tracing::info!(
                "Portal {}: {} links, {} admitted",
                portal,
                links.len(),
                candidates.len() - before
            );
        }

        for category in &entry_points.categories {
            let members = match self
                .fetcher
                .category_members(category, self.max_pages_per_category)
                .await
            {
                Ok(members) => members,
                Err(e) => {
                    tracing::warn!("Could not list members of {}: {}", category, e);
                    continue;
                }
            };

            let before = candidates.len();
            for member in &members {
                if let Admission::Full = self.admit(member, 0, &mut candidates) {
                    return candidates;
                }
            }
            tracing::info!(
                "{}: {} members, {} admitted",
                category,
                members.len(),
                candidates.len() - before
            );
        }

        candidates
    }

    /// Claims the on-topic outbound links of an accepted page
    ///
    /// # Arguments
    ///
    /// * `page` - The accepted page
    /// * `depth` - The depth the page itself was admitted at
    ///
    /// # Returns
    ///
    /// Candidates at `depth + 1`; empty once `depth` reaches the maximum.
    pub fn expand_links(&self, page: &ScrapedPage, depth: u32) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        if depth >= self.max_depth {
            tracing::trace!("Not expanding {} at depth {}", page.title(), depth);
            return candidates;
        }

        for link in page.links() {
            if !self.scorer.is_candidate_title(link.as_str()) {
                continue;
            }
            if let Admission::Full = self.admit_title(link.clone(), depth + 1, &mut candidates) {
                break;
            }
        }

        tracing::debug!(
            "Expanded {}: {} of {} links admitted",
            page.title(),
            candidates.len(),
            page.links().len()
        );

        candidates
    }
}
