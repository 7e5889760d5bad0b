use std::fmt;

/// Lifecycle of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// New entries may be dispatched
    Running,

    /// Nothing may be dispatched now, but tasks are still in flight
    ///
    /// When entered because the frontier ran dry, a completing task may admit new
    /// entries and move the run back to `Running`. Once the budget is exhausted
    /// the run stays here until the last task completes.
    Draining,

    /// No tasks in flight and nothing left to dispatch; terminal
    Done,
}

impl CrawlPhase {
    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if the coordinator may dispatch in this phase
    pub fn can_dispatch(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
