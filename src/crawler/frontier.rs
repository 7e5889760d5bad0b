//! Breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO queue of admitted (url, depth) entries awaiting dispatch
//! - The visited set, filled at admission time rather than fetch time
//! - Depth and article-path admission checks

use crate::url::ArticleFilter;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL admitted to the frontier, consumed exactly once when dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The article URL to fetch
    pub url: Url,

    /// Link distance from the seed article
    pub depth: u32,
}

/// Frontier owns the work queue and the deduplication set
///
/// Every URL in the queue is also in the visited set, and a URL enters the visited
/// set at most once, so no URL can be dispatched twice in a run even when several
/// parent pages link to it.
#[derive(Debug)]
pub struct Frontier {
    /// Entries in discovery order
    queue: VecDeque<FrontierEntry>,

    /// Identities of every URL ever admitted
    visited: HashSet<String>,

    /// Article-path rules for discovered links
    filter: ArticleFilter,

    /// Entries deeper than this are never admitted
    max_depth: u32,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new(filter: ArticleFilter, max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            filter,
            max_depth,
        }
    }

    /// Admits the seed article at depth 0
    ///
    /// The seed is trusted: only its identity is recorded, the article-path filter
    /// is not applied. Returns false if it was already admitted.
    pub fn seed(&mut self, url: Url) -> bool {
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }

        self.queue.push_back(FrontierEntry { url, depth: 0 });
        true
    }

    /// Offers a discovered URL for admission
    ///
    /// # Returns
    ///
    /// * `true` - The URL was admitted and queued
    /// * `false` - The URL is malformed, fails the article-path filter, exceeds
    ///   the maximum depth, or was admitted before
    pub fn offer(&mut self, url: &str, depth: u32) -> bool {
        if depth > self.max_depth {
            return false;
        }

        let Some(url) = self.filter.parse_admissible(url) else {
            return false;
        };

        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }

        tracing::trace!("Admitted {} at depth {}", url, depth);
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Removes up to `n` entries in discovery order
    pub fn take_ready(&mut self, n: usize) -> Vec<FrontierEntry> {
        let count = n.min(self.queue.len());
        self.queue.drain(..count).collect()
    }

    /// Returns whether no entries await dispatch
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of entries awaiting dispatch
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the number of URLs admitted so far in this run
    pub fn admitted_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if the URL was ever admitted
    pub fn was_admitted(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
