//! Configuration System
//!
//! Host configuration for the telemetry gate: the diagnostics flag that
//! drives the analytics sink, the static values the sink is built from, the
//! ingestion body cap, and logging. Layered with the `config` crate:
//! defaults, global file, explicit file, then environment.

use crate::logging::LoggingConfig;
use crate::telemetry::client::SinkConfigProvider;
use crate::telemetry::ingest::DEFAULT_MAX_BODY_BYTES;
use crate::telemetry::sinks::http::{HttpSinkOptions, DEFAULT_QUEUE_CAPACITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallsConfig {
    /// Host diagnostics flag; absent means disabled
    #[serde(default)]
    pub enable_diagnostics: Option<bool>,

    /// Cap on a single ingestion request body
    #[serde(default = "default_request_body_max_size_bytes")]
    pub request_body_max_size_bytes: u64,

    /// Analytics sink settings
    #[serde(default)]
    pub telemetry: TelemetrySettings,

    /// Values supplied by the host server
    #[serde(default)]
    pub host: HostSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub write_key: String,

    #[serde(default)]
    pub dataplane_url: String,

    #[serde(default)]
    pub build_hash: String,

    #[serde(default = "default_plugin_version")]
    pub plugin_version: String,

    /// Events buffered before `track` reports a full queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Host-provided identifiers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostSettings {
    #[serde(default)]
    pub diagnostic_id: String,

    #[serde(default)]
    pub server_version: String,
}

pub(crate) fn default_request_body_max_size_bytes() -> u64 {
    DEFAULT_MAX_BODY_BYTES
}

pub(crate) fn default_plugin_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

pub(crate) fn default_request_timeout_ms() -> u64 {
    5000
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            write_key: String::new(),
            dataplane_url: String::new(),
            build_hash: String::new(),
            plugin_version: default_plugin_version(),
            queue_capacity: default_queue_capacity(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl TelemetrySettings {
    pub fn sink_options(&self) -> HttpSinkOptions {
        HttpSinkOptions {
            queue_capacity: self.queue_capacity,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

impl Default for CallsConfig {
    fn default() -> Self {
        Self {
            enable_diagnostics: None,
            request_body_max_size_bytes: default_request_body_max_size_bytes(),
            telemetry: TelemetrySettings::default(),
            host: HostSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Telemetry(String),
    Host(String),
    Server(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Telemetry(msg) => write!(f, "Telemetry: {}", msg),
            ValidationError::Host(msg) => write!(f, "Host: {}", msg),
            ValidationError::Server(msg) => write!(f, "Server: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl CallsConfig {
    /// Whether the host currently wants diagnostics reported.
    pub fn diagnostics_enabled(&self) -> bool {
        self.enable_diagnostics.unwrap_or(false)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.request_body_max_size_bytes == 0 {
            errors.push(ValidationError::Server(
                "request_body_max_size_bytes must be greater than zero".to_string(),
            ));
        }
        if self.telemetry.queue_capacity == 0 {
            errors.push(ValidationError::Telemetry(
                "queue_capacity must be greater than zero".to_string(),
            ));
        }

        // Sink fields only matter once reporting is on
        if self.diagnostics_enabled() {
            if self.telemetry.write_key.trim().is_empty() {
                errors.push(ValidationError::Telemetry(
                    "write_key is required when diagnostics are enabled".to_string(),
                ));
            }
            if self.telemetry.dataplane_url.trim().is_empty() {
                errors.push(ValidationError::Telemetry(
                    "dataplane_url is required when diagnostics are enabled".to_string(),
                ));
            }
            if self.host.diagnostic_id.trim().is_empty() {
                errors.push(ValidationError::Host(
                    "diagnostic_id is required when diagnostics are enabled".to_string(),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Copy with the write key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.telemetry.write_key.is_empty() {
            copy.telemetry.write_key = "********".to_string();
        }
        copy
    }
}

impl SinkConfigProvider for CallsConfig {
    fn write_key(&self) -> String {
        self.telemetry.write_key.clone()
    }

    fn dataplane_url(&self) -> String {
        self.telemetry.dataplane_url.clone()
    }

    fn diagnostic_id(&self) -> String {
        self.host.diagnostic_id.clone()
    }

    fn server_version(&self) -> String {
        self.host.server_version.clone()
    }

    fn plugin_version(&self) -> String {
        self.telemetry.plugin_version.clone()
    }

    fn build_hash(&self) -> String {
        self.telemetry.build_hash.clone()
    }
}
