/// Page budget accounting for one crawl run
///
/// `saved` only ever grows. Dispatch is allowed while `saved + in_flight < limit`,
/// which counts running tasks as if they will succeed. A task that later fails
/// gives its share of the budget back, so the limit is approached conservatively
/// rather than hit exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlBudget {
    /// Maximum number of accepted successes
    limit: u32,

    /// Accepted successes so far
    saved: u32,

    /// Tasks dispatched but not yet completed
    in_flight: u32,
}

impl CrawlBudget {
    /// Creates a budget for `limit` accepted successes
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            saved: 0,
            in_flight: 0,
        }
    }

    /// Returns true if another task may be dispatched
    pub fn has_room(&self) -> bool {
        self.saved + self.in_flight < self.limit
    }

    /// Number of additional tasks that may be dispatched right now
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.saved + self.in_flight)
    }

    /// Returns true once the number of accepted successes reached the limit
    pub fn is_exhausted(&self) -> bool {
        self.saved >= self.limit
    }

    /// Records a dispatched task
    pub fn start_task(&mut self) {
        self.in_flight += 1;
    }

    /// Records a completed task, whatever its outcome
    pub fn finish_task(&mut self) {
        debug_assert!(self.in_flight > 0, "finish_task without a running task");
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Counts a success toward the budget
    ///
    /// Returns false, leaving the count unchanged, if the limit was already reached.
    pub fn try_accept(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.saved += 1;
        true
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn saved(&self) -> u32 {
        self.saved
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }
}
