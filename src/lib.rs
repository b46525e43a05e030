//! Calls Telemetry: runtime-toggled analytics reporting
//!
//! Owns the lifecycle of an analytics sink that can be switched on and off
//! by configuration at any time, and a validating gate for client-submitted
//! events that forwards only recognized events with trusted identity fields.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod telemetry;
pub mod watch;
