//! Text formatting for CLI results.

use crate::config::ValidationError;
use crate::telemetry::registry::{ServerEvent, CLIENT_EVENTS, CLIENT_TYPES};
use crate::telemetry::TelemetryStatus;

pub fn format_status_text(status: &TelemetryStatus) -> String {
    if !status.enabled {
        return "Telemetry: disabled".to_string();
    }
    let mut out = String::from("Telemetry: enabled");
    if let Some(url) = &status.dataplane_url {
        out.push_str(&format!("\n  Dataplane: {}", url));
    }
    if let Some(id) = &status.diagnostic_id {
        out.push_str(&format!("\n  Diagnostic ID: {}", id));
    }
    out
}

pub fn format_registry_text() -> String {
    let mut lines = vec!["Client events:".to_string()];
    lines.extend(CLIENT_EVENTS.iter().map(|e| format!("  {}", e)));
    lines.push("Client types:".to_string());
    lines.extend(CLIENT_TYPES.iter().map(|t| format!("  {}", t)));
    lines.push("Server events:".to_string());
    lines.extend(ServerEvent::ALL.iter().map(|e| format!("  {}", e)));
    lines.join("\n")
}

pub fn format_validation_text(result: &Result<(), Vec<ValidationError>>) -> String {
    match result {
        Ok(()) => "Configuration is valid".to_string(),
        Err(errors) => {
            let mut out = format!("Configuration has {} error(s):", errors.len());
            for error in errors {
                out.push_str(&format!("\n  - {}", error));
            }
            out
        }
    }
}
