//! URL handling for submitted checks
//!
//! This module provides:
//! - Validation of user-submitted URLs before anything is sent to the service
//! - Derivation of the service endpoint from the configured base URL
//! - Filesystem-safe slugs used in export file names

use crate::ValidationError;
use url::Url;

/// Path of the check endpoint, relative to the service base URL
pub const CHECK_PATH: &str = "api/check";

/// Validates a URL submitted for checking
///
/// The URL must start with `http://` or `https://` followed by at least one
/// more character. Surrounding whitespace is ignored; the trimmed URL is
/// returned on success.
///
/// # Example
///
/// ```
/// use compliance_checker::url::validate_check_url;
///
/// assert_eq!(validate_check_url(" https://example.com ").unwrap(), "https://example.com");
/// assert!(validate_check_url("not-a-url").is_err());
/// ```
pub fn validate_check_url(input: &str) -> Result<&str, ValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| ValidationError::Scheme(trimmed.to_string()))?;

    match rest.chars().next() {
        Some(c) if c != '\n' => Ok(trimmed),
        _ => Err(ValidationError::MissingHost(trimmed.to_string())),
    }
}

/// Builds the check endpoint from the service base URL
///
/// A base URL with a path prefix keeps it: `http://host/app` yields
/// `http://host/app/api/check`.
pub fn check_endpoint(base_url: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base_url)?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(CHECK_PATH)
}

/// Replaces every character that is not an ASCII letter or digit with `-`
pub fn export_slug(url: &str) -> String {
    url.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
