//! URL handling module for Wiki-Trawler
//!
//! This module provides seed URL construction, host identity, and the article-path
//! filter that decides which discovered links are crawlable articles.

mod article;

use crate::{UrlError, UrlResult};
use url::Url;

pub use article::{is_article_href, ArticleFilter, RESERVED_NAMESPACES};

/// Builds the seed article URL for a topic
///
/// The topic is appended to `base_url + article_prefix` with spaces turned into
/// underscores, which is how the wiki names its article paths.
///
/// # Examples
///
/// ```
/// use wiki_trawler::url::seed_url;
///
/// let url = seed_url("https://en.wikipedia.org", "/wiki/", "Machine learning").unwrap();
/// assert_eq!(url.as_str(), "https://en.wikipedia.org/wiki/Machine_learning");
/// ```
pub fn seed_url(base_url: &str, article_prefix: &str, topic: &str) -> UrlResult<Url> {
    let base = parse_http_url(base_url)?;
    let path = format!("{}{}", article_prefix, topic.trim().replace(' ', "_"));
    base.join(&path).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Parses an absolute http(s) URL that carries a host
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Returns the identity of the host a URL points at
///
/// Host names are compared case-insensitively and the port is included, so a mock
/// server on another port of the same machine counts as a different host.
pub fn host_key(url: &Url) -> Option<(String, u16)> {
    let host = url.host_str()?.to_lowercase();
    let port = url.port_or_known_default()?;
    Some((host, port))
}
