//! HTML parser for extracting article text and links
//!
//! This module handles parsing article HTML to extract:
//! - The article title
//! - The body text of the main content container
//! - Outgoing links that follow the article-path convention

use crate::url::is_article_href;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Extracted information from an article page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArticle {
    /// The article title (empty if none was found)
    pub title: String,

    /// Cleaned paragraphs joined by blank lines (empty if there is no main content)
    pub body: String,

    /// Article links as they appear in the page, not yet resolved
    pub links: Vec<String>,
}

impl ParsedArticle {
    /// Returns true if the page had no extractable main content
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Turns a fetched document into title, body text and outgoing links
///
/// Implementations must not fail: a page without recognisable content yields an
/// empty body and no links.
pub trait PageParser: Send + Sync {
    fn parse(&self, html: &str) -> ParsedArticle;
}

/// Parser for MediaWiki article pages
///
/// # Extraction Rules
///
/// - Main content is the first `div.mw-parser-output`
/// - Body is every non-empty `<p>` inside it, with citation markers removed
/// - Title is `h1#firstHeading`, falling back to `<title>`
/// - Links are `a[href]` inside the main content that pass [`is_article_href`]
#[derive(Debug, Clone)]
pub struct WikiPageParser {
    article_prefix: String,
}

impl WikiPageParser {
    pub fn new(article_prefix: &str) -> Self {
        Self {
            article_prefix: article_prefix.to_string(),
        }
    }
}

impl PageParser for WikiPageParser {
    fn parse(&self, html: &str) -> ParsedArticle {
        let document = Html::parse_document(html);
        let title = extract_title(&document).unwrap_or_default();

        let Some(content) = find_main_content(&document) else {
            return ParsedArticle {
                title,
                ..ParsedArticle::default()
            };
        };

        ParsedArticle {
            title,
            body: extract_body(content),
            links: extract_links(content, &self.article_prefix),
        }
    }
}

/// Extracts the article heading, or the document title if there is none
fn extract_title(document: &Html) -> Option<String> {
    ["h1#firstHeading", "title"]
        .iter()
        .filter_map(|selector| Selector::parse(selector).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| collapse_whitespace(&element.text().collect::<String>()))
                .filter(|s| !s.is_empty())
        })
}

fn find_main_content(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("div.mw-parser-output").ok()?;
    document.select(&selector).next()
}

/// Collects the cleaned, non-empty paragraphs of the main content
fn extract_body(content: ElementRef<'_>) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };

    content
        .select(&selector)
        .map(|p| clean_text(&p.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Collects article hrefs inside the main content, in document order
fn extract_links(content: ElementRef<'_>, article_prefix: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    content
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_article_href(href, article_prefix))
        .map(str::to_string)
        .collect()
}

fn citation_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\[\s*(?:[0-9]+|[a-zA-Z]+|note\s*\d+)\s*\]").ok())
        .as_ref()
}

/// Removes bracketed citation markers (`[1]`, `[a]`, `[note 3]`) and collapses whitespace
pub fn clean_text(text: &str) -> String {
    match citation_pattern() {
        Some(pattern) => collapse_whitespace(&pattern.replace_all(text, "")),
        None => collapse_whitespace(text),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
