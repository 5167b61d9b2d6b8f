//! Configuration module for Compliance Checker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use compliance_checker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("compliance-checker.toml")).unwrap();
//! println!("Checks go to: {}", config.service.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExportConfig, ProgressConfig, ServiceConfig, StorageConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
