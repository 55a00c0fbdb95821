use crate::config::RelevanceConfig;

/// Per-location weights of a keyword hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Added once per distinct keyword found in the title
    pub title: f64,
    /// Added per occurrence of a keyword in the body text
    pub body: f64,
    /// Added once per (keyword, category) pair
    pub category: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            title: 2.0,
            body: 0.1,
            category: 1.0,
        }
    }
}

/// Deterministic weighted-keyword relevance model
///
/// The score has no upper bound and grows with the number of body
/// occurrences, so longer articles score higher than short ones on the same
/// topic. That skew is accepted: the threshold is meant to drop off-topic
/// pages, not to rank on-topic ones.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    keywords: Vec<String>,
    anchor_keywords: Vec<String>,
    weights: Weights,
    threshold: f64,
    relevant_score: f64,
}

impl RelevanceScorer {
    /// Creates a scorer; keywords are lower-cased and de-duplicated
    pub fn new<I, S>(keywords: I, weights: Weights, threshold: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: normalize_keywords(keywords),
            anchor_keywords: Vec::new(),
            weights,
            threshold,
            relevant_score: 1.0,
        }
    }

    /// Keywords that force acceptance when present in a title
    pub fn with_anchor_keywords<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.anchor_keywords = normalize_keywords(anchors);
        self
    }

    /// Score above which an accepted page counts as relevant
    pub fn with_relevant_score(mut self, relevant_score: f64) -> Self {
        self.relevant_score = relevant_score;
        self
    }

    pub fn from_config(config: &RelevanceConfig) -> Self {
        let weights = Weights {
            title: config.title_weight,
            body: config.body_weight,
            category: config.category_weight,
        };
        Self::new(&config.keywords, weights, config.threshold)
            .with_anchor_keywords(&config.anchor_keywords)
            .with_relevant_score(config.relevant_score)
    }

    /// Scores a page from its title, body text and category names
    pub fn score<S: AsRef<str>>(&self, title: &str, body: &str, categories: &[S]) -> f64 {
        let title_lower = title.to_lowercase();
        let body_lower = body.to_lowercase();
        let categories_lower: Vec<String> = categories
            .iter()
            .map(|c| c.as_ref().to_lowercase())
            .collect();

        let mut score = 0.0;
        for keyword in &self.keywords {
            if title_lower.contains(keyword.as_str()) {
                score += self.weights.title;
            }

            score += self.weights.body * body_lower.matches(keyword.as_str()).count() as f64;

            let category_hits = categories_lower
                .iter()
                .filter(|c| c.contains(keyword.as_str()))
                .count();
            score += self.weights.category * category_hits as f64;
        }

        score
    }

    /// Cheap pre-filter used before fetching: does the title mention any keyword?
    pub fn is_candidate_title(&self, title: &str) -> bool {
        let title_lower = title.to_lowercase();
        self.keywords.iter().any(|k| title_lower.contains(k.as_str()))
    }

    /// Returns true if the title carries an anchor keyword
    pub fn is_anchor_title(&self, title: &str) -> bool {
        let title_lower = title.to_lowercase();
        self.anchor_keywords
            .iter()
            .any(|k| title_lower.contains(k.as_str()))
    }

    /// Acceptance policy: above threshold, or an anchor topic regardless of score
    pub fn accepts(&self, title: &str, score: f64) -> bool {
        score >= self.threshold || self.is_anchor_title(title)
    }

    pub fn is_relevant(&self, score: f64) -> bool {
        score > self.relevant_score
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref().trim().to_lowercase();
        if !keyword.is_empty() && !normalized.contains(&keyword) {
            normalized.push(keyword);
        }
    }
    normalized
}
