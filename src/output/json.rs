//! Portable JSON export

use crate::model::CheckResult;
use crate::output::ExportResult;

/// Pretty-prints the result with two-space indentation
pub fn to_json(result: &CheckResult) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Parses a document produced by `to_json`
pub fn from_json(document: &str) -> ExportResult<CheckResult> {
    Ok(serde_json::from_str(document)?)
}
