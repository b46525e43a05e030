//! Shared telemetry helpers: timestamps and message id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};

static MESSAGE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Generate a process-unique message id.
pub fn new_message_id() -> String {
    let ts = Utc::now().timestamp_millis();
    let pid = std::process::id();
    let seq = MESSAGE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("msg-{ts}-{pid}-{seq}")
}
