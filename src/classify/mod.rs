//! Error classification
//!
//! Failures coming back from a check are plain text. This module maps that text
//! onto a small taxonomy (`ErrorKind`) that drives the guidance shown to users.
//!
//! Classification is an ordered rule table: the first rule with a matching
//! keyword wins. Matching is a case-insensitive substring search.

mod guidance;

pub use guidance::Guidance;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The service could not be reached
    Network,
    /// The URL was rejected as malformed
    Validation,
    /// The service reported a server-side failure
    Server,
    /// The analysis took too long
    Timeout,
    /// Anything else
    Generic,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::Timeout => "timeout",
            Self::Generic => "generic",
        }
    }

    /// User-facing guidance for this kind of failure
    pub fn guidance(&self) -> Guidance {
        Guidance::for_kind(*self)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification rules in precedence order
const RULES: &[(ErrorKind, &[&str])] = &[
    (ErrorKind::Network, &["network", "fetch", "connection"]),
    (ErrorKind::Validation, &["invalid url", "url format"]),
    (ErrorKind::Timeout, &["timeout"]),
    (ErrorKind::Server, &["server", "500"]),
];

/// Classifies an error message returned by the service
///
/// # Example
///
/// ```
/// use compliance_checker::classify::{classify, ErrorKind};
///
/// assert_eq!(classify("Request timeout after 30s"), ErrorKind::Timeout);
/// assert_eq!(classify("oops"), ErrorKind::Generic);
/// ```
pub fn classify(message: &str) -> ErrorKind {
    let message = message.to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| message.contains(k)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ErrorKind::Generic)
}

/// Classifies a transport-level failure (no HTTP response was received)
pub fn classify_transport(message: &str) -> ErrorKind {
    if message.to_lowercase().contains("fetch") {
        ErrorKind::Network
    } else {
        ErrorKind::Generic
    }
}
