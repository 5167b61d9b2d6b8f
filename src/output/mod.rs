//! Export engine for completed check results
//!
//! This module handles:
//! - Portable JSON documents
//! - Paginated PDF reports (layout in `pdf`, serialization in `pdf_writer`)
//! - Clipboard text and share summaries
//! - Writing export files with deterministic names

mod json;
mod pdf;
mod pdf_writer;
mod text;

pub use json::{from_json, to_json};
pub use pdf::{
    sanitize_text, text_width, to_pdf_document, to_pdf_document_at, wrap_text, Align, Color,
    Font, PdfDocument, PdfElement, PdfPage, CONTENT_BOTTOM, DETAIL_WIDTH, FOOTER_LABEL, FOOTER_Y,
    MAX_DETAIL_LINES, PAGE_HEIGHT, PAGE_WIDTH, REPORT_TITLE,
};
pub use text::{to_clipboard_text, to_share_summary, ShareSummary, SHARE_TITLE};

use crate::model::CheckResult;
use crate::url::export_slug;
use chrono::Utc;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// File formats an export can be written as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format '{}' (expected json or pdf)", other)),
        }
    }
}

/// Builds the export file name for `url` at `millis` (Unix milliseconds)
///
/// # Example
///
/// ```
/// use compliance_checker::output::{export_filename, ExportFormat};
///
/// assert_eq!(
///     export_filename("https://a.io/x", ExportFormat::Json, 1700000000000),
///     "compliance-check-https---a-io-x-1700000000000.json"
/// );
/// ```
pub fn export_filename(url: &str, format: ExportFormat, millis: i64) -> String {
    format!(
        "compliance-check-{}-{}.{}",
        export_slug(url),
        millis,
        format.extension()
    )
}

/// Renders `result` in `format`
pub fn render(result: &CheckResult, format: ExportFormat) -> ExportResult<Vec<u8>> {
    match format {
        ExportFormat::Json => Ok(to_json(result)?.into_bytes()),
        ExportFormat::Pdf => Ok(to_pdf_document(result).to_bytes()),
    }
}

/// Writes `result` into `dir` and returns the path of the new file
///
/// # Arguments
///
/// * `result` - The result to export
/// * `format` - Output format
/// * `dir` - Target directory, created if missing
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(ExportError)` - Rendering or writing failed; nothing else is affected
pub fn export_to_dir(
    result: &CheckResult,
    format: ExportFormat,
    dir: &Path,
) -> ExportResult<PathBuf> {
    let bytes = render(result, format)?;
    let path = dir.join(export_filename(
        &result.url,
        format,
        Utc::now().timestamp_millis(),
    ));

    std::fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    std::fs::write(&path, bytes).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Exported {} as {} to {}", result.url, format, path.display());
    Ok(path)
}
