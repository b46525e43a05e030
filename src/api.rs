//! Telemetry API
//!
//! Framework-agnostic surface for the host: a track-event handler that the
//! host router calls with the raw body and the authenticated user id, and a
//! configuration hook that toggles reporting.

use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CallsConfig;
use crate::error::ConfigurationError;
use crate::telemetry::{ClientFactory, EventIngestionGate, TelemetryManager};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;

/// JSON response body returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl ApiResponse {
    pub fn success() -> Self {
        Self {
            code: STATUS_OK,
            msg: Some("success".to_string()),
            err: None,
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self {
            code: STATUS_BAD_REQUEST,
            msg: None,
            err: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == STATUS_OK
    }
}

#[derive(Clone)]
pub struct TelemetryApi {
    manager: Arc<TelemetryManager>,
    gate: Arc<EventIngestionGate>,
}

impl TelemetryApi {
    /// Build a disabled API around `factory`.
    pub fn new(factory: Arc<dyn ClientFactory>, max_body_bytes: u64) -> Self {
        let manager = Arc::new(TelemetryManager::new(factory));
        let gate = Arc::new(EventIngestionGate::new(Arc::clone(&manager), max_body_bytes));
        Self { manager, gate }
    }

    pub fn manager(&self) -> &Arc<TelemetryManager> {
        &self.manager
    }

    pub fn gate(&self) -> &Arc<EventIngestionGate> {
        &self.gate
    }

    /// Apply a (re)loaded configuration: refresh the body cap and move the
    /// sink to match the diagnostics flag. A zero body cap is ignored and
    /// the previous cap kept.
    pub fn on_configuration_change(&self, config: &CallsConfig) -> Result<(), ConfigurationError> {
        match config.request_body_max_size_bytes {
            0 => warn!(
                current = self.gate.max_body_bytes(),
                "ignoring zero request body cap"
            ),
            cap => self.gate.set_max_body_bytes(cap),
        }
        self.manager.set_enabled(config.diagnostics_enabled(), config)
    }

    /// Handle `POST /telemetry/track`. `user_id` comes from the trusted
    /// request context.
    pub fn handle_track_event(&self, body: impl Read, user_id: &str) -> ApiResponse {
        match self.gate.ingest(body, user_id) {
            Ok(accepted) => {
                debug!(
                    handler = "handleTrackEvent",
                    code = STATUS_OK,
                    event = %accepted.event,
                    user_id = %user_id,
                    "track event accepted"
                );
                ApiResponse::success()
            }
            Err(reason) => {
                warn!(
                    handler = "handleTrackEvent",
                    code = STATUS_BAD_REQUEST,
                    user_id = %user_id,
                    reason = %reason,
                    "track event rejected"
                );
                ApiResponse::bad_request(reason.to_string())
            }
        }
    }
}
