//! Event ingestion gate: validate client submissions and forward them.
//!
//! Checks run in a fixed order: disabled, bounded read and parse, event
//! name, client type. The first failing check decides the rejection.

use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::RejectionReason;
use crate::telemetry::events::{EventSubmission, TrackEventRequest};
use crate::telemetry::manager::TelemetryManager;
use crate::telemetry::registry::{is_recognized_client_type, is_recognized_event};

/// Default cap on a single request body.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;

/// An accepted submission. Forwarding happened; its outcome is not reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub event: String,
}

pub struct EventIngestionGate {
    manager: Arc<TelemetryManager>,
    max_body_bytes: AtomicU64,
}

impl EventIngestionGate {
    pub fn new(manager: Arc<TelemetryManager>, max_body_bytes: u64) -> Self {
        Self {
            manager,
            max_body_bytes: AtomicU64::new(max_body_bytes),
        }
    }

    pub fn manager(&self) -> &Arc<TelemetryManager> {
        &self.manager
    }

    pub fn max_body_bytes(&self) -> u64 {
        self.max_body_bytes.load(Ordering::Relaxed)
    }

    pub fn set_max_body_bytes(&self, max_body_bytes: u64) {
        self.max_body_bytes.store(max_body_bytes, Ordering::Relaxed);
    }

    /// Read at most the configured number of bytes from `body`, validate the
    /// decoded request and forward it on behalf of `actor_id`.
    pub fn ingest(&self, body: impl Read, actor_id: &str) -> Result<Accepted, RejectionReason> {
        if !self.manager.is_enabled() {
            return Err(RejectionReason::TelemetryDisabled);
        }
        let request = self.read_request(body)?;
        self.ingest_request(request, actor_id)
    }

    /// Validate and forward an already decoded request.
    pub fn ingest_request(
        &self,
        request: TrackEventRequest,
        actor_id: &str,
    ) -> Result<Accepted, RejectionReason> {
        if !self.manager.is_enabled() {
            return Err(RejectionReason::TelemetryDisabled);
        }
        if !is_recognized_event(&request.event) {
            return Err(RejectionReason::UnrecognizedEvent);
        }
        if !is_recognized_client_type(&request.client_type) {
            return Err(RejectionReason::UnrecognizedClientType);
        }

        let submission = EventSubmission::from_request(request, actor_id);
        let event = submission.event.clone();
        debug!(event = %event, client_type = %submission.client_type, "forwarding client event");
        self.manager.track(&event, submission.into_properties());
        Ok(Accepted { event })
    }

    fn read_request(&self, body: impl Read) -> Result<TrackEventRequest, RejectionReason> {
        let limit = self.max_body_bytes();
        let mut buf = Vec::new();
        body.take(limit.saturating_add(1))
            .read_to_end(&mut buf)
            .map_err(|e| RejectionReason::MalformedPayload(e.to_string()))?;
        if buf.len() as u64 > limit {
            return Err(RejectionReason::MalformedPayload(
                "http: request body too large".to_string(),
            ));
        }
        // Only the first JSON value is decoded; anything after it is ignored.
        match serde_json::Deserializer::from_slice(&buf)
            .into_iter::<TrackEventRequest>()
            .next()
        {
            Some(decoded) => {
                decoded.map_err(|e| RejectionReason::MalformedPayload(e.to_string()))
            }
            None => Err(RejectionReason::MalformedPayload("EOF".to_string())),
        }
    }
}
