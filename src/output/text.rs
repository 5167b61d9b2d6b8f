//! Plain-text exports: clipboard text and share summary

use crate::model::CheckResult;
use serde::Serialize;

pub const SHARE_TITLE: &str = "Compliance Check Results";

/// Renders the result as plain text suitable for the clipboard
///
/// ```text
/// Compliance Check Results
/// URL: https://example.com
/// Score: 85
///
/// 1. Alt Text: PASS
/// 2. Contrast: FAIL
/// ```
pub fn to_clipboard_text(result: &CheckResult) -> String {
    let lines: Vec<String> = result
        .checks
        .iter()
        .enumerate()
        .map(|(i, check)| {
            format!(
                "{}. {}: {}",
                i + 1,
                check.name,
                if check.passed { "PASS" } else { "FAIL" }
            )
        })
        .collect();

    format!(
        "{}\nURL: {}\nScore: {}\n\n{}",
        SHARE_TITLE,
        result.url,
        result.score_label(),
        lines.join("\n")
    )
}

/// Payload handed to a native share mechanism
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareSummary {
    pub title: String,
    pub text: String,
    pub url: String,

    #[serde(skip)]
    fallback: String,
}

impl ShareSummary {
    /// Text to copy when no share mechanism is available
    pub fn fallback_text(&self) -> &str {
        &self.fallback
    }
}

pub fn to_share_summary(result: &CheckResult) -> ShareSummary {
    ShareSummary {
        title: SHARE_TITLE.to_string(),
        text: format!("Check out these compliance results: {}", result.score_label()),
        url: result.url.clone(),
        fallback: to_clipboard_text(result),
    }
}
