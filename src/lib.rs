//! Compliance Checker: a client for a remote web-compliance service
//!
//! This crate submits URLs to a remote WCAG compliance service, drives a
//! simulated progress indicator while the analysis runs, classifies failures,
//! keeps a bounded history of results, and exports results as JSON, PDF or
//! plain text.

pub mod classify;
pub mod config;
pub mod controller;
pub mod model;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Compliance Checker operations
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Export error: {0}")]
    Export(#[from] output::ExportError),

    #[error("Invalid URL: {0}")]
    Validation(#[from] ValidationError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("No result available: {0}")]
    NoResult(String),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// A submitted URL was rejected before any request was made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL must start with http:// or https://: {0}")]
    Scheme(String),

    #[error("URL has nothing after the scheme: {0}")]
    MissingHost(String),
}

/// Result type alias for Compliance Checker operations
pub type Result<T> = std::result::Result<T, ComplianceError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classify::{classify, ErrorKind};
pub use config::Config;
pub use controller::{CheckController, SubmitOutcome};
pub use model::{Check, CheckResult, HistoryEntry};
pub use state::{LifecycleState, Snapshot};
