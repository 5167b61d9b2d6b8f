//! HTTP client for the remote compliance service
//!
//! This module handles every exchange with `POST /api/check`, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Decoding success payloads into `ServerCheckResult`
//! - Extracting a human-readable message from failed responses
//! - Classifying every failure into an `ErrorKind`

use crate::classify::{classify, classify_transport, ErrorKind};
use crate::config::ServiceConfig;
use crate::model::ServerCheckResult;
use crate::url::check_endpoint;
use crate::ComplianceError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Message used when a failed response carries no usable text
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to check URL";

/// Message used when a success response is not a result object
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";

/// A check request failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// No HTTP response was received
    #[error("{message}")]
    Transport { message: String },

    /// The service answered with a non-success status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The service answered 2xx but the body is not a usable result
    #[error("{message}")]
    InvalidResponse { message: String },
}

impl ServiceError {
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message }
            | Self::Status { message, .. }
            | Self::InvalidResponse { message } => message,
        }
    }

    /// Classifies the failure
    ///
    /// Status failures go through the full keyword table. Failures without a
    /// usable response only distinguish "could not fetch" from everything else.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { message, .. } => classify(message),
            Self::Transport { message } | Self::InvalidResponse { message } => {
                classify_transport(message)
            }
        }
    }
}

#[derive(Serialize)]
struct CheckRequest<'a> {
    url: &'a str,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The service configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ServiceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the remote compliance service
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    endpoint: Url,
}

impl ServiceClient {
    /// Creates a client for the service described by `config`
    pub fn new(config: &ServiceConfig) -> Result<Self, ComplianceError> {
        let endpoint = check_endpoint(&config.base_url)?;
        let client = build_http_client(config)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Asks the service to check `url`
    ///
    /// Exactly one request is sent. Every outcome other than a decodable
    /// result object is returned as a `ServiceError`.
    pub async fn check(&self, url: &str) -> Result<ServerCheckResult, ServiceError> {
        tracing::debug!("POST {} for {}", self.endpoint, url);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&CheckRequest { url })
            .send()
            .await
            .map_err(|e| ServiceError::Transport {
                message: format!("Failed to fetch {}: {}", self.endpoint, e),
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        tracing::debug!("Service answered {} ({})", status, content_type);

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = extract_error_message(&content_type, &body);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: if message.is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    message
                },
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport {
                message: format!("Failed to fetch {}: {}", self.endpoint, e),
            })?;

        decode_result(&body)
    }
}

/// Decodes a success body into a result
///
/// The body must be a JSON object with the result shape; anything else
/// (including `null`, arrays and scalars) is an invalid response.
pub fn decode_result(body: &[u8]) -> Result<ServerCheckResult, ServiceError> {
    let invalid = || ServiceError::InvalidResponse {
        message: INVALID_RESPONSE_MESSAGE.to_string(),
    };

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Success body is not JSON: {}", e);
        invalid()
    })?;

    if !value.is_object() {
        tracing::debug!("Success body is not an object");
        return Err(invalid());
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("Success body does not match the result shape: {}", e);
        invalid()
    })
}

/// Pulls a message out of a failed response body
///
/// JSON bodies contribute their `error`, `message` or `detail` string field (in
/// that order). Other bodies are used verbatim. Returns an empty string when
/// nothing usable is found.
pub fn extract_error_message(content_type: &str, body: &[u8]) -> String {
    if content_type.contains("application/json") {
        if let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) {
            return ["error", "message", "detail"]
                .iter()
                .filter_map(|key| fields.get(*key).and_then(Value::as_str))
                .find(|text| !text.is_empty())
                .unwrap_or_default()
                .to_string();
        }
    }

    String::from_utf8_lossy(body).trim().to_string()
}
