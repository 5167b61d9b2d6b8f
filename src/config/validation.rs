use crate::config::types::{Config, ExportConfig, ProgressConfig, ServiceConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_service_config(&config.service)?;
    validate_progress_config(&config.progress)?;
    validate_storage_config(&config.storage)?;
    validate_export_config(&config.export)?;
    Ok(())
}

/// Validates the remote service configuration
fn validate_service_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_progress_config(config: &ProgressConfig) -> Result<(), ConfigError> {
    if config.base_unit_ms < 1 || config.base_unit_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "base-unit-ms must be between 1 and 60000, got {}",
            config.base_unit_ms
        )));
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_export_config(config: &ExportConfig) -> Result<(), ConfigError> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
