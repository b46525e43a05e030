//! Analytics client abstraction.
//!
//! The manager never talks to a concrete client. It asks a [`ClientFactory`]
//! for one when reporting is switched on and drops it when switched off.

use crate::error::{ConfigurationError, ReportingError};
use crate::telemetry::events::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default property keys merged into every reported event.
pub const PROP_SERVER_VERSION: &str = "ServerVersion";
pub const PROP_PLUGIN_VERSION: &str = "PluginVersion";
pub const PROP_PLUGIN_BUILD: &str = "PluginBuild";

/// Settings an analytics client is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub write_key: String,
    pub dataplane_url: String,
    pub diagnostic_id: String,
    #[serde(default)]
    pub default_props: Properties,
}

impl ClientConfig {
    /// Check the fields every client needs before anything is constructed.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.write_key.trim().is_empty() {
            return Err(ConfigurationError::InvalidClientConfig(
                "write key cannot be empty".to_string(),
            ));
        }
        if self.diagnostic_id.trim().is_empty() {
            return Err(ConfigurationError::InvalidClientConfig(
                "diagnostic id cannot be empty".to_string(),
            ));
        }
        let url = reqwest::Url::parse(&self.dataplane_url).map_err(|e| {
            ConfigurationError::InvalidClientConfig(format!(
                "invalid dataplane url '{}': {}",
                self.dataplane_url, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigurationError::InvalidClientConfig(format!(
                "dataplane url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }
}

/// Source of the values needed to build a [`ClientConfig`].
///
/// Implemented by the loaded host configuration; tests implement it directly.
pub trait SinkConfigProvider {
    fn write_key(&self) -> String;
    fn dataplane_url(&self) -> String;
    fn diagnostic_id(&self) -> String;
    fn server_version(&self) -> String;
    fn plugin_version(&self) -> String;
    fn build_hash(&self) -> String;

    fn client_config(&self) -> ClientConfig {
        let mut default_props = Properties::new();
        default_props.insert(
            PROP_SERVER_VERSION.to_string(),
            Value::String(self.server_version()),
        );
        default_props.insert(
            PROP_PLUGIN_VERSION.to_string(),
            Value::String(self.plugin_version()),
        );
        default_props.insert(
            PROP_PLUGIN_BUILD.to_string(),
            Value::String(self.build_hash()),
        );
        ClientConfig {
            write_key: self.write_key(),
            dataplane_url: self.dataplane_url(),
            diagnostic_id: self.diagnostic_id(),
            default_props,
        }
    }
}

/// An external analytics client.
///
/// `track` should return quickly; it runs while the manager holds a read
/// lock. `close` must be idempotent.
pub trait AnalyticsClient: Send + Sync {
    fn track(&self, event: &str, properties: Properties) -> Result<(), ReportingError>;

    fn close(&self) -> Result<(), ReportingError>;
}

/// Builds analytics clients on demand.
pub trait ClientFactory: Send + Sync {
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn AnalyticsClient>, ConfigurationError>;
}
