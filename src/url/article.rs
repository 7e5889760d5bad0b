use crate::url::host_key;
use url::Url;

/// Namespace prefixes of non-article pages
///
/// A link whose topic segment begins with one of these is never admitted.
pub const RESERVED_NAMESPACES: &[&str] = &[
    "Category:",
    "File:",
    "Help:",
    "Portal:",
    "Special:",
    "Template:",
    "Template_talk:",
    "Talk:",
    "Wikipedia:",
    "Module:",
    "Draft:",
    "Book:",
    "TimedText:",
    "MediaWiki:",
    "Gadget:",
    "Gadget_definition:",
];

/// Checks a raw `href` attribute against the article-path convention
///
/// This is the cheap pre-filter applied while extracting links from a page:
/// the href must start with the article prefix, carry no fragment or query,
/// and its topic must not live in a reserved namespace.
///
/// # Examples
///
/// ```
/// use wiki_trawler::url::is_article_href;
///
/// assert!(is_article_href("/wiki/Dog", "/wiki/"));
/// assert!(!is_article_href("/wiki/Category:Animals", "/wiki/"));
/// assert!(!is_article_href("/wiki/Dog#History", "/wiki/"));
/// assert!(!is_article_href("/wiki/Dog?action=edit", "/wiki/"));
/// ```
pub fn is_article_href(href: &str, article_prefix: &str) -> bool {
    let Some(topic) = href.strip_prefix(article_prefix) else {
        return false;
    };

    if href.contains('#') || href.contains('?') {
        return false;
    }

    is_article_topic(topic)
}

/// Returns true if a topic segment names an ordinary article
fn is_article_topic(topic: &str) -> bool {
    if topic.is_empty() {
        return false;
    }

    // Namespace separators are sometimes percent-encoded in hrefs
    let decoded = topic.replace("%3A", ":").replace("%3a", ":");

    !RESERVED_NAMESPACES
        .iter()
        .any(|namespace| decoded.starts_with(namespace))
}

/// Admission rule for absolute URLs offered to the frontier
///
/// A URL is admissible when it lives on the start host, has no fragment or query,
/// and its path is an article path outside the reserved namespaces.
#[derive(Debug, Clone)]
pub struct ArticleFilter {
    host: (String, u16),
    article_prefix: String,
}

impl ArticleFilter {
    /// Creates a filter bound to the host of `start_url`
    ///
    /// Returns None if the start URL has no host.
    pub fn new(start_url: &Url, article_prefix: &str) -> Option<Self> {
        Some(Self {
            host: host_key(start_url)?,
            article_prefix: article_prefix.to_string(),
        })
    }

    /// Decides whether a resolved URL is a crawlable article
    pub fn admits(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        if host_key(url).as_ref() != Some(&self.host) {
            return false;
        }

        if url.fragment().is_some() || url.query().is_some() {
            return false;
        }

        match url.path().strip_prefix(self.article_prefix.as_str()) {
            Some(topic) => is_article_topic(topic),
            None => false,
        }
    }

    /// Parses and checks a URL string; malformed input is simply rejected
    pub fn parse_admissible(&self, url: &str) -> Option<Url> {
        let parsed = Url::parse(url).ok()?;
        self.admits(&parsed).then_some(parsed)
    }

    pub fn article_prefix(&self) -> &str {
        &self.article_prefix
    }
}
