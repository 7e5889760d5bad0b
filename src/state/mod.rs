//! State module for tracking crawl progress
//!
//! This module provides the run state owned by the crawl coordinator.
//!
//! # Components
//!
//! - `CrawlBudget`: Counts accepted successes and in-flight tasks against the page limit
//! - `CrawlPhase`: The run's `Running -> Draining -> Done` lifecycle
//! - `CrawlState`: Frontier plus budget, mutated only by the coordinator

mod budget;
mod crawl_state;
mod phase;

// Re-export main types
pub use budget::CrawlBudget;
pub use crawl_state::CrawlState;
pub use phase::CrawlPhase;
