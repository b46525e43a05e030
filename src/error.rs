//! Error types for the calls telemetry gate.
//!
//! Three tiers: lifecycle errors surface to whoever toggles reporting,
//! rejections surface to the submitting client as 400s, and reporting
//! errors never leave the telemetry manager.

use thiserror::Error;

/// Analytics sink construction or teardown failures.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid telemetry client config: {0}")]
    InvalidClientConfig(String),

    #[error("Failed to initialize telemetry client: {0}")]
    ClientInit(String),

    #[error("Failed to close telemetry client: {0}")]
    ClientClose(#[source] ReportingError),
}

/// Errors raised by an analytics client while reporting or shutting down.
#[derive(Debug, Error)]
pub enum ReportingError {
    #[error("Telemetry client is closed")]
    Closed,

    #[error("Telemetry event queue is full")]
    QueueFull,

    #[error("Failed to encode telemetry event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Telemetry delivery failed: {0}")]
    Delivery(String),
}

/// Why an inbound event submission was refused.
///
/// Display strings are the reasons sent back in the 400 response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("telemetry is disabled")]
    TelemetryDisabled,

    #[error("{0}")]
    MalformedPayload(String),

    #[error("invalid telemetry event")]
    UnrecognizedEvent,

    #[error("invalid client type")]
    UnrecognizedClientType,
}

/// Host-level errors: configuration loading, I/O, watching.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Watch error: {0}")]
    WatchError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<notify::Error> for ApiError {
    fn from(err: notify::Error) -> Self {
        ApiError::WatchError(err.to_string())
    }
}
