//! Teinei: a robots.txt politeness gate for web crawlers
//!
//! This crate implements the politeness stage of a crawl pipeline: before a
//! page is fetched, the gate consults the target host's robots exclusion
//! policy to decide whether the fetch is permitted and absorbs the declared
//! crawl-delay for that host. Policy documents are fetched and parsed once
//! per host per process run and served from memory afterwards.
//!
//! The gate is fail-open: a missing, unreachable or garbled robots document
//! never blocks the crawl, it simply means "no rules".

pub mod config;
pub mod fetch;
pub mod gate;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Teinei operations
///
/// The gate itself never surfaces errors to the pipeline; these exist at the
/// construction and configuration boundaries.
#[derive(Debug, Error)]
pub enum TeineiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Transport errors from fetching a robots policy document
///
/// Every variant is absorbed at the cache boundary and converted into an
/// empty document; none of them propagate past [`robots::PolicyCache`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),
}

/// Result type alias for Teinei operations
pub type Result<T> = std::result::Result<T, TeineiError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::GateConfig;
pub use fetch::{HttpFetcher, RobotsFetcher};
pub use gate::{PipelineStep, PolitenessGate, StepContext, Verdict, ROBOTS_IS_PATH_ALLOWED};
pub use robots::{parse_robots, PolicyCache, RobotsPolicy};
pub use crate::url::HostKey;
