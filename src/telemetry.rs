//! Telemetry domain: event registry, analytics sink lifecycle, and client
//! event ingestion.

mod types;

pub mod client;
pub mod events;
pub mod ingest;
pub mod manager;
pub mod registry;
pub mod sinks;

pub use client::{AnalyticsClient, ClientConfig, ClientFactory, SinkConfigProvider};
pub use events::{EventSubmission, Properties, TrackEventRequest};
pub use ingest::{Accepted, EventIngestionGate, DEFAULT_MAX_BODY_BYTES};
pub use manager::{TelemetryManager, TelemetryStatus};
pub use registry::{is_recognized_client_type, is_recognized_event, ServerEvent};
pub use types::{new_message_id, now_rfc3339};
