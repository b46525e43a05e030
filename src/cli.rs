//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to the telemetry API.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands};
pub use presentation::{format_registry_text, format_status_text, format_validation_text};
pub use route::RunContext;
