//! Check result data model
//!
//! This module defines the two shapes a compliance result takes:
//! - `ServerCheckResult`: the payload exactly as the remote service returns it
//! - `CheckResult`: the client-side record, enriched with a `timestamp` and an `id`
//!
//! The enrichment step is the only way to build a `CheckResult` from the wire,
//! and it is where the pass/total counters are re-derived from the checks.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One compliance rule outcome, as produced by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Rule name (e.g. "Alt Text")
    pub name: String,

    /// Whether the page passed this rule
    pub passed: bool,

    /// Human explanation of the outcome
    #[serde(default)]
    pub details: String,

    /// Suggested fix, only present when the service produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// The result payload as returned by `POST /api/check`
///
/// Fields the client owns (`timestamp`, `id`) are not part of this type. Any
/// extra fields sent by the service are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCheckResult {
    pub url: String,

    #[serde(deserialize_with = "deserialize_score")]
    pub score: f64,

    #[serde(default)]
    pub passed_count: usize,

    #[serde(default)]
    pub total_count: usize,

    #[serde(default)]
    pub checks: Vec<Check>,
}

/// A completed analysis, as recorded by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// The checked URL
    pub url: String,

    /// Service-defined score, conventionally 0-100
    pub score: f64,

    /// Number of checks with `passed == true`
    pub passed_count: usize,

    /// Number of checks
    pub total_count: usize,

    /// Rule outcomes in service order
    pub checks: Vec<Check>,

    /// When the client received the result
    pub timestamp: DateTime<Utc>,

    /// Client-generated unique token
    pub id: String,
}

/// A history record: a `CheckResult` as stamped when it was inserted
pub type HistoryEntry = CheckResult;

impl CheckResult {
    /// Builds a client record from a server payload, stamping it with `now`
    /// and a freshly generated id
    pub fn from_server(server: ServerCheckResult) -> Self {
        let now = Utc::now();
        Self::enrich(server, now, generate_check_id(now))
    }

    /// Builds a client record from a server payload with an explicit stamp
    ///
    /// `passed_count` and `total_count` are always recomputed from `checks`.
    pub fn enrich(server: ServerCheckResult, timestamp: DateTime<Utc>, id: String) -> Self {
        let passed_count = server.checks.iter().filter(|c| c.passed).count();
        let total_count = server.checks.len();

        if server.passed_count != passed_count || server.total_count != total_count {
            tracing::warn!(
                "Service reported {}/{} passed checks for {}, recomputed {}/{}",
                server.passed_count,
                server.total_count,
                server.url,
                passed_count,
                total_count
            );
        }

        Self {
            url: server.url,
            score: server.score,
            passed_count,
            total_count,
            checks: server.checks,
            timestamp,
            id,
        }
    }

    /// Number of checks that did not pass
    pub fn failed_count(&self) -> usize {
        self.total_count.saturating_sub(self.passed_count)
    }

    /// Score band used for color coding
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::for_score(self.score)
    }

    /// Score formatted without a trailing `.0` for whole numbers
    pub fn score_label(&self) -> String {
        format_score(self.score)
    }
}

/// Coarse classification of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// score >= 80
    Pass,
    /// 50 <= score < 80
    Warning,
    /// score < 50
    Fail,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Pass
        } else if score >= 50.0 {
            Self::Warning
        } else {
            Self::Fail
        }
    }
}

/// Formats a score the way it is shown to users (`85`, `72.5`)
pub fn format_score(score: f64) -> String {
    score.to_string()
}

/// Generates a result id of the form `<unix-millis>-<9 hex chars>`
pub fn generate_check_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.timestamp_millis(), &random[..9])
}

/// Accepts a JSON number, a numeric string, or a fraction string like `"7/10"`
/// (converted to a percentage).
fn deserialize_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(f64),
        Text(String),
    }

    let score = match RawScore::deserialize(deserializer)? {
        RawScore::Number(n) => n,
        RawScore::Text(text) => parse_score_text(&text)
            .ok_or_else(|| de::Error::custom(format!("unrecognized score '{}'", text)))?,
    };

    if score.is_finite() {
        Ok(score)
    } else {
        Err(de::Error::custom("score must be finite"))
    }
}

fn parse_score_text(text: &str) -> Option<f64> {
    let text = text.trim().trim_end_matches('%');

    if let Some((num, den)) = text.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den <= 0.0 {
            return None;
        }
        return Some((num / den * 100.0 * 100.0).round() / 100.0);
    }

    text.parse().ok()
}
