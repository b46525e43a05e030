//! Closed sets of recognized event names and client types.
//!
//! Client events and client types are the only names reachable from
//! ingestion. Server events are emitted by the host directly through the
//! manager and are never accepted from a client payload.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// Event names a client may submit. Case-sensitive.
pub const CLIENT_EVENTS: &[&str] = &[
    "user_open_expanded_view",
    "user_close_expanded_view",
    "user_open_participants_list",
    "user_close_participants_list",
    "user_share_screen",
    "user_unshare_screen",
    "user_raise_hand",
    "user_lower_hand",
    "user_open_channel_link",
];

/// Client type tags a submission may carry.
pub const CLIENT_TYPES: &[&str] = &["web", "mobile", "desktop"];

static CLIENT_EVENT_SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
static CLIENT_TYPE_SET: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn client_event_set() -> &'static HashSet<&'static str> {
    CLIENT_EVENT_SET.get_or_init(|| CLIENT_EVENTS.iter().copied().collect())
}

fn client_type_set() -> &'static HashSet<&'static str> {
    CLIENT_TYPE_SET.get_or_init(|| CLIENT_TYPES.iter().copied().collect())
}

pub fn is_recognized_event(name: &str) -> bool {
    client_event_set().contains(name)
}

pub fn is_recognized_client_type(client_type: &str) -> bool {
    client_type_set().contains(client_type)
}

/// Server-originated events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEvent {
    CallStarted,
    CallEnded,
    CallUserJoined,
    CallUserLeft,
    CallNotifyAdmin,
}

impl ServerEvent {
    pub const ALL: [ServerEvent; 5] = [
        ServerEvent::CallStarted,
        ServerEvent::CallEnded,
        ServerEvent::CallUserJoined,
        ServerEvent::CallUserLeft,
        ServerEvent::CallNotifyAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerEvent::CallStarted => "call_started",
            ServerEvent::CallEnded => "call_ended",
            ServerEvent::CallUserJoined => "call_user_joined",
            ServerEvent::CallUserLeft => "call_user_left",
            ServerEvent::CallNotifyAdmin => "call_notify_admin",
        }
    }
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
