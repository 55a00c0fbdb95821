//! Topical relevance scoring
//!
//! A page's score is a weighted count of keyword hits in its title, body and
//! categories. The same keyword set doubles as a presence-only pre-filter on
//! link titles, so the crawler can discard off-topic links before fetching
//! them.

mod scorer;

pub use scorer::{RelevanceScorer, Weights};
