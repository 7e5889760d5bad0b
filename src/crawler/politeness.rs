//! Temporal politeness: request spacing and retry backoff
//!
//! The spatial bound (how many requests may be outstanding at once) is the
//! fetcher's semaphore; this module only decides how long to wait.

use crate::config::PolitenessConfig;
use rand::Rng;
use std::time::Duration;

/// Computes politeness delays from a base delay plus uniform jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacer {
    base_delay: Duration,
    jitter: Duration,
}

impl Pacer {
    pub fn new(base_delay: Duration, jitter: Duration) -> Self {
        Self { base_delay, jitter }
    }

    pub fn from_config(config: &PolitenessConfig) -> Self {
        Self::new(config.base_delay(), config.jitter())
    }

    /// A pacer that never waits, for tests and local mirrors
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Mandatory pause after every attempt: `base + U(0, jitter)`
    pub fn spacing(&self) -> Duration {
        self.base_delay.saturating_add(self.random_jitter())
    }

    /// Pause before retry number `attempt + 1`: `base * attempt + U(0, jitter)`
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(attempt)
            .saturating_add(self.random_jitter())
    }

    fn random_jitter(&self) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        let fraction: f64 = rand::thread_rng().gen_range(0.0..=1.0);
        self.jitter.mul_f64(fraction)
    }

    /// Sleeps for the given delay; a zero delay does not yield
    pub async fn pause(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn jitter(&self) -> Duration {
        self.jitter
    }
}
