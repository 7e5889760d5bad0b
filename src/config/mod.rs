//! Configuration module for Wiki-Trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a run can be configured entirely from the command line.
//!
//! # Example
//!
//! ```no_run
//! use wiki_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, PolitenessConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
