//! HTTP analytics client.
//!
//! Events are encoded on the caller's thread, queued on a bounded channel
//! and delivered one by one from a single worker thread. Delivery failures
//! are logged by the worker; they never reach the caller.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{ConfigurationError, ReportingError};
use crate::telemetry::client::{AnalyticsClient, ClientConfig, ClientFactory};
use crate::telemetry::events::Properties;
use crate::telemetry::types::{new_message_id, now_rfc3339};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const TRACK_PATH: &str = "v1/track";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    event: String,
    user_id: String,
    anonymous_id: String,
    message_id: String,
    timestamp: String,
    properties: Properties,
    context: serde_json::Value,
}

/// Options for the delivery queue and HTTP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSinkOptions {
    pub queue_capacity: usize,
    pub request_timeout: Duration,
}

impl Default for HttpSinkOptions {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub struct HttpAnalyticsClient {
    config: ClientConfig,
    sender: RwLock<Option<SyncSender<Vec<u8>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl HttpAnalyticsClient {
    pub fn new(config: ClientConfig, options: HttpSinkOptions) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let endpoint = track_endpoint(&config.dataplane_url)?;
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| {
                ConfigurationError::ClientInit(format!("Failed to create HTTP client: {}", e))
            })?;

        let (sender, receiver) = sync_channel(options.queue_capacity.max(1));
        let write_key = config.write_key.clone();
        let worker = std::thread::Builder::new()
            .name("telemetry-delivery".to_string())
            .spawn(move || deliver_all(http, endpoint, write_key, receiver))
            .map_err(|e| {
                ConfigurationError::ClientInit(format!("Failed to spawn delivery worker: {}", e))
            })?;

        Ok(Self {
            config,
            sender: RwLock::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        })
    }

    fn build_message(&self, event: &str, properties: Properties) -> TrackMessage {
        let mut merged = self.config.default_props.clone();
        merged.extend(properties);
        TrackMessage {
            kind: "track",
            event: event.to_string(),
            user_id: self.config.diagnostic_id.clone(),
            anonymous_id: self.config.diagnostic_id.clone(),
            message_id: new_message_id(),
            timestamp: now_rfc3339(),
            properties: merged,
            context: json!({
                "library": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        }
    }
}

impl AnalyticsClient for HttpAnalyticsClient {
    fn track(&self, event: &str, properties: Properties) -> Result<(), ReportingError> {
        let payload = serde_json::to_vec(&self.build_message(event, properties))?;
        let guard = self.sender.read();
        let sender = guard.as_ref().ok_or(ReportingError::Closed)?;
        sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => ReportingError::QueueFull,
            TrySendError::Disconnected(_) => ReportingError::Closed,
        })
    }

    fn close(&self) -> Result<(), ReportingError> {
        // Dropping the sender lets the worker drain what is queued and exit.
        drop(self.sender.write().take());
        let Some(worker) = self.worker.lock().take() else {
            return Ok(());
        };
        worker
            .join()
            .map_err(|_| ReportingError::Delivery("delivery worker panicked".to_string()))
    }
}

fn track_endpoint(dataplane_url: &str) -> Result<Url, ConfigurationError> {
    let base = format!("{}/", dataplane_url.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|url| url.join(TRACK_PATH))
        .map_err(|e| {
            ConfigurationError::InvalidClientConfig(format!(
                "invalid dataplane url '{}': {}",
                dataplane_url, e
            ))
        })
}

fn deliver_all(http: Client, endpoint: Url, write_key: String, receiver: Receiver<Vec<u8>>) {
    for payload in receiver {
        let result = http
            .post(endpoint.clone())
            .basic_auth(&write_key, None::<&str>)
            .header("Content-Type", "application/json")
            .body(payload)
            .send();
        match result {
            Ok(response) if response.status().is_success() => {
                debug!(status = %response.status(), "telemetry event delivered");
            }
            Ok(response) => {
                warn!(status = %response.status(), "telemetry endpoint rejected event");
            }
            Err(err) => {
                warn!(error = %err, "telemetry delivery failed");
            }
        }
    }
    debug!("telemetry delivery worker stopped");
}

/// Factory producing [`HttpAnalyticsClient`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpClientFactory {
    pub options: HttpSinkOptions,
}

impl HttpClientFactory {
    pub fn new(options: HttpSinkOptions) -> Self {
        Self { options }
    }
}

impl ClientFactory for HttpClientFactory {
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn AnalyticsClient>, ConfigurationError> {
        let client = HttpAnalyticsClient::new(config.clone(), self.options)?;
        Ok(Box::new(client))
    }
}
