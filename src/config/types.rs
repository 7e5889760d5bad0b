use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Wiki-Trawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed article identifier, e.g. "Machine learning"
    #[serde(rename = "start-topic")]
    pub start_topic: String,
    pub crawler: CrawlerConfig,
    pub politeness: PolitenessConfig,
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Creates a configuration with defaults for the given seed topic
    pub fn for_topic(topic: &str) -> Self {
        Self {
            start_topic: topic.trim().to_string(),
            ..Self::default()
        }
    }

    /// Directory that receives article files and the index
    ///
    /// Falls back to `<topic>_wiki_articles` (lowercased, spaces as underscores)
    /// when no directory was configured.
    pub fn output_directory(&self) -> PathBuf {
        match &self.output.directory {
            Some(dir) => dir.clone(),
            None => PathBuf::from(format!(
                "{}_wiki_articles",
                self.start_topic.trim().replace(' ', "_").to_lowercase()
            )),
        }
    }

    /// Full path of the index file
    pub fn index_path(&self) -> PathBuf {
        self.output_directory().join(&self.output.index_file)
    }
}

/// Crawl shape: budget, depth and pool size
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of accepted successes in one run
    #[serde(rename = "page-limit")]
    pub page_limit: u32,

    /// Maximum link depth from the seed article
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of crawl tasks running concurrently
    pub workers: u32,

    /// Number of tasks allowed to be doing network I/O at once (defaults to `workers`)
    #[serde(rename = "max-parallel-requests")]
    pub max_parallel_requests: Option<u32>,
}

impl CrawlerConfig {
    /// Effective size of the outbound request permit pool
    pub fn parallel_requests(&self) -> u32 {
        self.max_parallel_requests.unwrap_or(self.workers)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_limit: 30,
            max_depth: 1,
            workers: 4,
            max_parallel_requests: None,
        }
    }
}

/// Request pacing and retry behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolitenessConfig {
    /// Base delay applied after every request (seconds)
    #[serde(rename = "base-delay-seconds")]
    pub base_delay_seconds: f64,

    /// Upper bound of the uniform random delay added on top (seconds)
    #[serde(rename = "jitter-seconds")]
    pub jitter_seconds: f64,

    /// Hard timeout of a single attempt (seconds)
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: f64,

    /// Total attempts per URL on transient failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl PolitenessConfig {
    pub fn base_delay(&self) -> Duration {
        seconds_to_duration(self.base_delay_seconds)
    }

    pub fn jitter(&self) -> Duration {
        seconds_to_duration(self.jitter_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        seconds_to_duration(self.request_timeout_seconds)
    }
}

/// Non-positive and NaN values become zero; values too large saturate
fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            base_delay_seconds: 1.0,
            jitter_seconds: 0.5,
            request_timeout_seconds: 15.0,
            max_retries: 3,
        }
    }
}

/// The single host being crawled and its article-path convention
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path prefix every article shares, e.g. "/wiki/"
    #[serde(rename = "article-prefix")]
    pub article_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            article_prefix: "/wiki/".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// Free-form contact or purpose note appended in parentheses
    pub contact: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (contact)`
    pub fn header_value(&self) -> String {
        if self.contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name, self.crawler_version, self.contact
            )
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "WikiTrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact: "+polite single-host crawler; educational use".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for article files and the index
    pub directory: Option<PathBuf>,

    /// File name of the index inside the output directory
    #[serde(rename = "index-file")]
    pub index_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            index_file: "index.csv".to_string(),
        }
    }
}
