use crate::crawler::{Frontier, FrontierEntry};
use crate::state::{CrawlBudget, CrawlPhase};
use url::Url;

/// Mutable state of one crawl run
///
/// Owned by the coordinator and touched only between task dispatch and task
/// completion, so admission and budget decisions are serialized without locks.
/// Worker tasks never see this struct.
#[derive(Debug)]
pub struct CrawlState {
    pub frontier: Frontier,
    pub budget: CrawlBudget,

    /// Size of the worker pool
    workers: u32,
}

impl CrawlState {
    pub fn new(frontier: Frontier, budget: CrawlBudget, workers: u32) -> Self {
        Self {
            frontier,
            budget,
            workers,
        }
    }

    /// Derives the current phase from frontier and budget
    pub fn phase(&self) -> CrawlPhase {
        let can_dispatch = !self.frontier.is_empty() && self.budget.has_room();

        if can_dispatch {
            CrawlPhase::Running
        } else if self.budget.in_flight() > 0 {
            CrawlPhase::Draining
        } else {
            CrawlPhase::Done
        }
    }

    /// Number of entries that may be dispatched right now
    pub fn dispatch_capacity(&self) -> usize {
        if !self.phase().can_dispatch() {
            return 0;
        }

        let free_workers = self.workers.saturating_sub(self.budget.in_flight());
        let capacity = free_workers.min(self.budget.remaining()) as usize;
        capacity.min(self.frontier.len())
    }

    /// Takes the next ready entries and counts them as in flight
    pub fn take_dispatchable(&mut self) -> Vec<FrontierEntry> {
        let entries = self.frontier.take_ready(self.dispatch_capacity());
        for _ in &entries {
            self.budget.start_task();
        }
        entries
    }

    /// Offers the links of a completed page as children at `depth + 1`
    ///
    /// Links are resolved against the page URL. Offering stops as soon as the
    /// budget has no room left, so the queue does not grow near the limit.
    /// Returns the number of newly admitted entries.
    pub fn expand(&mut self, page_url: &Url, depth: u32, links: &[String]) -> usize {
        let mut admitted = 0;

        for href in links {
            if !self.budget.has_room() {
                break;
            }

            let Ok(absolute) = page_url.join(href) else {
                continue;
            };

            if self.frontier.offer(absolute.as_str(), depth + 1) {
                admitted += 1;
            }
        }

        admitted
    }

    pub fn workers(&self) -> u32 {
        self.workers
    }
}
