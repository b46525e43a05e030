//! Event schema for client-submitted telemetry.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Free-form event properties.
pub type Properties = Map<String, Value>;

/// Property keys the gate writes itself.
pub const PROP_SOURCE: &str = "Source";
pub const PROP_ACTUAL_USER_ID: &str = "ActualUserID";
pub const PROP_CLIENT_TYPE: &str = "ClientType";

/// JSON body of a track-event request.
///
/// Missing or null fields decode as empty so that validation, not parsing,
/// decides whether an event name or client type is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventRequest {
    #[serde(default, alias = "Event", deserialize_with = "null_as_empty")]
    pub event: String,
    #[serde(default, alias = "ClientType", deserialize_with = "null_as_empty")]
    pub client_type: String,
    #[serde(default, alias = "Source", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, alias = "Props", skip_serializing_if = "Option::is_none")]
    pub props: Option<Properties>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A validated submission ready to forward.
///
/// The actor identity is taken from the trusted request context, never
/// from the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSubmission {
    pub event: String,
    pub client_type: String,
    pub source: Option<String>,
    pub properties: Properties,
    pub actor_id: String,
}

impl EventSubmission {
    pub fn from_request(request: TrackEventRequest, actor_id: impl Into<String>) -> Self {
        Self {
            event: request.event,
            client_type: request.client_type,
            source: request.source,
            properties: request.props.unwrap_or_default(),
            actor_id: actor_id.into(),
        }
    }

    /// Properties as forwarded: caller props, then `Source` if non-empty,
    /// then `ActualUserID` and `ClientType`, overwriting any caller values.
    pub fn into_properties(self) -> Properties {
        let mut properties = self.properties;
        if let Some(source) = self.source.filter(|s| !s.is_empty()) {
            properties.insert(PROP_SOURCE.to_string(), Value::String(source));
        }
        properties.insert(
            PROP_ACTUAL_USER_ID.to_string(),
            Value::String(self.actor_id),
        );
        properties.insert(
            PROP_CLIENT_TYPE.to_string(),
            Value::String(self.client_type),
        );
        properties
    }
}
