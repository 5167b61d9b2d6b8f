use serde::Deserialize;

/// Main configuration structure for Compliance Checker
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Remote compliance service connection
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service; checks are posted to `<base-url>/api/check`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Simulated progress timing
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// Stage `i` fires `(i + 1) * base-unit-ms` after a check starts
    #[serde(rename = "base-unit-ms", default = "default_base_unit_ms")]
    pub base_unit_ms: u64,

    /// Pause between the 100% "Complete!" stage and publishing the result
    #[serde(rename = "settle-delay-ms", default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            base_unit_ms: default_base_unit_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file holding history and the cached result
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Export destination
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    90
}

fn default_user_agent() -> String {
    format!("compliance-checker/{}", env!("CARGO_PKG_VERSION"))
}

fn default_base_unit_ms() -> u64 {
    1000
}

fn default_settle_delay_ms() -> u64 {
    500
}

fn default_output_dir() -> String {
    ".".to_string()
}
