//! Controller module for running compliance checks
//!
//! This module contains the check orchestration logic, including:
//! - The HTTP client for the remote compliance service
//! - The synthetic progress simulation
//! - The lifecycle state machine tying them together

mod client;
mod coordinator;
mod progress;

pub use client::{
    build_http_client, decode_result, extract_error_message, ServiceClient, ServiceError,
    FALLBACK_ERROR_MESSAGE, INVALID_RESPONSE_MESSAGE,
};
pub use coordinator::{CheckController, SubmitOutcome};
pub use progress::{
    ProgressHandle, ProgressSchedule, ProgressSimulator, ProgressStage, COMPLETE_STAGE,
};
