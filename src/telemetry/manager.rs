//! Telemetry manager: sole owner of the analytics sink.
//!
//! The sink lives behind a read/write lock. `track` and `is_enabled` take
//! the read side. Transitions are serialized by a separate mutex so client
//! construction and close run outside the read/write lock; only the swap of
//! the handle takes the write side. A client is never closed while a
//! `track` call holds it: close happens after the handle has been taken out
//! under the write lock, by which point every reader has released it.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::ConfigurationError;
use crate::telemetry::client::{AnalyticsClient, ClientConfig, ClientFactory, SinkConfigProvider};
use crate::telemetry::events::Properties;
use crate::telemetry::registry::ServerEvent;

struct SinkHandle {
    client: Box<dyn AnalyticsClient>,
    config: ClientConfig,
}

/// Point-in-time view of the manager. Never includes the write key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryStatus {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataplane_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_id: Option<String>,
}

pub struct TelemetryManager {
    sink: RwLock<Option<SinkHandle>>,
    transition: Mutex<()>,
    factory: Arc<dyn ClientFactory>,
}

impl TelemetryManager {
    /// Create a disabled manager.
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            sink: RwLock::new(None),
            transition: Mutex::new(()),
            factory,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.read().is_some()
    }

    pub fn status(&self) -> TelemetryStatus {
        let guard = self.sink.read();
        match guard.as_ref() {
            Some(handle) => TelemetryStatus {
                enabled: true,
                dataplane_url: Some(handle.config.dataplane_url.clone()),
                diagnostic_id: Some(handle.config.diagnostic_id.clone()),
            },
            None => TelemetryStatus {
                enabled: false,
                dataplane_url: None,
                diagnostic_id: None,
            },
        }
    }

    /// Drive the sink towards `enabled`. No-op when already there.
    pub fn set_enabled(
        &self,
        enabled: bool,
        provider: &dyn SinkConfigProvider,
    ) -> Result<(), ConfigurationError> {
        if enabled {
            self.enable(provider)
        } else {
            self.disable()
        }
    }

    /// Build a client from `provider` and install it. A failed build leaves
    /// the manager disabled.
    pub fn enable(&self, provider: &dyn SinkConfigProvider) -> Result<(), ConfigurationError> {
        let _transition = self.transition.lock();
        if self.sink.read().is_some() {
            return Ok(());
        }

        debug!("Initializing telemetry");
        let config = provider.client_config();
        let client = self.factory.create(&config)?;
        *self.sink.write() = Some(SinkHandle { client, config });
        Ok(())
    }

    /// Remove and close the current client. The handle is discarded even if
    /// close fails, so a later enable starts clean.
    pub fn disable(&self) -> Result<(), ConfigurationError> {
        let _transition = self.transition.lock();
        let handle = self.sink.write().take();
        let Some(handle) = handle else {
            return Ok(());
        };

        debug!("Deinitializing telemetry");
        handle
            .client
            .close()
            .map_err(ConfigurationError::ClientClose)
    }

    /// Report an event. Silently does nothing while disabled; client errors
    /// are logged and dropped.
    pub fn track(&self, event: &str, properties: Properties) {
        let guard = self.sink.read();
        let Some(handle) = guard.as_ref() else {
            return;
        };
        if let Err(err) = handle.client.track(event, properties) {
            error!(event = %event, error = %err, "failed to track telemetry event");
        }
    }

    pub fn track_server_event(&self, event: ServerEvent, properties: Properties) {
        self.track(event.as_str(), properties);
    }
}

impl Drop for TelemetryManager {
    fn drop(&mut self) {
        if let Some(handle) = self.sink.get_mut().take() {
            if let Err(err) = handle.client.close() {
                warn!(error = %err, "failed to close telemetry client on shutdown");
            }
        }
    }
}
