//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a descriptive user agent and per-attempt timeout
//! - Capping concurrent outbound requests with a semaphore
//! - Mandatory spacing after every attempt
//! - Retry with increasing backoff for transient failures
//! - Error classification

use crate::config::{Config, UserAgentConfig};
use crate::crawler::politeness::Pacer;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

/// Result of fetching one URL, after all attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A 2xx response was received
    Success {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
        /// Attempts made, including the successful one
        attempts: u32,
    },

    /// No usable response could be obtained
    Failure {
        /// Status of the last response, if any response was received
        last_status: Option<u16>,
        /// Attempts made
        attempts: u32,
        /// Why the fetcher gave up
        reason: FailureReason,
    },
}

impl FetchOutcome {
    /// Number of attempts the outcome took
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::Failure { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Terminal reason of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Every attempt hit a transient error
    RetriesExhausted,

    /// The host answered with a non-retryable status
    HardError,

    /// The worker task running the fetch died before reporting
    WorkerAborted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RetriesExhausted => "retries_exhausted",
            Self::HardError => "hard_error",
            Self::WorkerAborted => "worker_aborted",
        };
        write!(f, "{}", label)
    }
}

/// Classification of a single failed attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// HTTP 429, 5xx, or a network/timeout error; worth retrying
    #[error("transient remote error{}: {message}", status_suffix(.status))]
    Transient {
        status: Option<u16>,
        message: String,
    },

    /// Any other non-success status; retrying will not help
    #[error("permanent remote error: HTTP {status}")]
    Permanent { status: u16 },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl AttemptError {
    fn from_reqwest(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timeout".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };

        Self::Transient {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}

/// Classifies a response status
///
/// | Status | Result |
/// |--------|--------|
/// | 2xx | `Ok(())` |
/// | 429, 5xx | `Transient` |
/// | anything else | `Permanent` |
pub fn classify_status(status: StatusCode) -> Result<(), AttemptError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Err(AttemptError::Transient {
            status: Some(status.as_u16()),
            message: status
                .canonical_reason()
                .unwrap_or("server error")
                .to_string(),
        })
    } else {
        Err(AttemptError::Permanent {
            status: status.as_u16(),
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Hard timeout applied to every request
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use wiki_trawler::config::UserAgentConfig;
/// use wiki_trawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Polite HTTP fetcher shared by all worker tasks
///
/// Two independent mechanisms keep the load on the host low:
/// - a semaphore caps how many requests are outstanding at once, independent of
///   how many crawl tasks are running
/// - a [`Pacer`] spaces requests out in time and backs off on transient errors
pub struct PoliteFetcher {
    client: Client,
    permits: Arc<Semaphore>,
    pacer: Pacer,
    max_attempts: u32,
}

impl PoliteFetcher {
    /// Creates a fetcher from explicit parts
    pub fn new(client: Client, max_parallel: usize, pacer: Pacer, max_attempts: u32) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_parallel.max(1))),
            pacer,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Creates a fetcher from the crawl configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, config.politeness.request_timeout())?;

        Ok(Self::new(
            client,
            config.crawler.parallel_requests() as usize,
            Pacer::from_config(&config.politeness),
            config.politeness.max_retries,
        ))
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Success |
    /// | HTTP 429 / 5xx | Retry after `base * attempt + jitter` |
    /// | Timeout / network error | Retry after `base * attempt + jitter` |
    /// | Other status | Immediate HardError |
    /// | Transient on last attempt | RetriesExhausted |
    ///
    /// Every attempt, successful or not, is followed by the pacer's spacing delay.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let mut last_status = None;

        for attempt in 1..=self.max_attempts {
            let result = self.attempt(url).await;
            Pacer::pause(self.pacer.spacing()).await;

            match result {
                Ok((status, body)) => {
                    tracing::debug!("Fetched {} (HTTP {}, attempt {})", url, status, attempt);
                    return FetchOutcome::Success {
                        status,
                        body,
                        attempts: attempt,
                    };
                }
                Err(AttemptError::Permanent { status }) => {
                    tracing::debug!("Giving up on {}: HTTP {}", url, status);
                    return FetchOutcome::Failure {
                        last_status: Some(status),
                        attempts: attempt,
                        reason: FailureReason::HardError,
                    };
                }
                Err(AttemptError::Transient { status, message }) => {
                    last_status = status;

                    if attempt < self.max_attempts {
                        let backoff = self.pacer.backoff(attempt);
                        tracing::warn!(
                            "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                            attempt,
                            self.max_attempts,
                            url,
                            message,
                            backoff
                        );
                        Pacer::pause(backoff).await;
                    } else {
                        tracing::warn!(
                            "Attempt {}/{} for {} failed ({}), retries exhausted",
                            attempt,
                            self.max_attempts,
                            url,
                            message
                        );
                    }
                }
            }
        }

        FetchOutcome::Failure {
            last_status,
            attempts: self.max_attempts,
            reason: FailureReason::RetriesExhausted,
        }
    }

    /// Performs one request while holding a permit
    ///
    /// The permit covers the whole network exchange, body included, and is
    /// released before any politeness delay.
    async fn attempt(&self, url: &str) -> Result<(u16, String), AttemptError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AttemptError::Transient {
                status: None,
                message: "request permit pool closed".to_string(),
            })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AttemptError::from_reqwest(&e))?;

        let status = response.status();
        classify_status(status)?;

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::from_reqwest(&e))?;

        Ok((status.as_u16(), body))
    }

    /// Number of request permits currently free
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
