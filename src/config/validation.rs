use crate::config::types::{Config, CrawlerConfig, OutputConfig, PolitenessConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
///
/// Invalid configuration is the only fatal failure of a run, so everything the
/// crawl later relies on (non-zero pool sizes, usable durations, a parseable
/// base URL) is checked here.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.start_topic.trim().is_empty() {
        return Err(ConfigError::Validation(
            "start topic cannot be empty".to_string(),
        ));
    }

    validate_crawler_config(&config.crawler)?;
    validate_politeness_config(&config.politeness)?;
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page_limit must be >= 1, got {}",
            config.page_limit
        )));
    }

    if config.workers < 1 {
        return Err(ConfigError::Validation(format!(
            "workers must be >= 1, got {}",
            config.workers
        )));
    }

    if config.parallel_requests() < 1 {
        return Err(ConfigError::Validation(format!(
            "max_parallel_requests must be >= 1, got {}",
            config.parallel_requests()
        )));
    }

    Ok(())
}

/// Validates pacing, timeout and retry settings
fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    validate_seconds("base_delay_seconds", config.base_delay_seconds)?;
    validate_seconds("jitter_seconds", config.jitter_seconds)?;
    validate_seconds("request_timeout_seconds", config.request_timeout_seconds)?;

    if config.request_timeout_seconds <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_seconds must be > 0, got {}",
            config.request_timeout_seconds
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// A duration setting must be a non-negative number a `Duration` can hold
fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a finite number >= 0, got {}",
            name, value
        )));
    }

    if Duration::try_from_secs_f64(value).is_err() {
        return Err(ConfigError::Validation(format!(
            "{} is too large, got {}",
            name, value
        )));
    }

    Ok(())
}

/// Validates the crawled site and its article-path convention
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    let prefix = &config.article_prefix;
    if prefix.len() < 2 || !prefix.starts_with('/') || !prefix.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "article_prefix must look like '/wiki/', got '{}'",
            prefix
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.index_file.is_empty() {
        return Err(ConfigError::Validation(
            "index_file cannot be empty".to_string(),
        ));
    }

    if config.index_file.contains('/') || config.index_file.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "index_file must be a bare file name, got '{}'",
            config.index_file
        )));
    }

    Ok(())
}
