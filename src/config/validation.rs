use crate::config::types::{Config, CrawlerConfig, OutputConfig, RelevanceConfig, WikiConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent fetch workers
const MAX_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_wiki_config(&config.wiki)?;
    validate_crawler_config(&config.crawler)?;
    validate_relevance_config(&config.relevance)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates remote access configuration
fn validate_wiki_config(config: &WikiConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.language.is_empty()
        || !config
            .language
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "language must contain only lowercase letters and hyphens, got '{}'",
            config.language
        )));
    }

    let endpoint = config.endpoint();
    let url = Url::parse(&endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_url '{}': {}", endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_url '{}' must use HTTP or HTTPS",
            endpoint
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates crawl bounds
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    for (name, value) in [
        ("batch_size", config.batch_size),
        ("max_total_pages", config.max_total_pages),
        ("max_links_per_page", config.max_links_per_page),
        ("max_pages_per_category", config.max_pages_per_category),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates the keyword model
fn validate_relevance_config(config: &RelevanceConfig) -> Result<(), ConfigError> {
    if config.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "at least one relevance keyword is required".to_string(),
        ));
    }

    if config
        .keywords
        .iter()
        .chain(config.anchor_keywords.iter())
        .any(|k| k.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "relevance keywords cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("threshold", config.threshold),
        ("relevant_score", config.relevant_score),
        ("title_weight", config.title_weight),
        ("body_weight", config.body_weight),
        ("category_weight", config.category_weight),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a finite number >= 0, got {}",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.basename.is_empty() || config.basename.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "basename must be a non-empty file name, got '{}'",
            config.basename
        )));
    }

    if let Some(path) = &config.database_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "database_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
