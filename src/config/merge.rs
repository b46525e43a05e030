//! Merge rules: defaults, override order, conflict handling.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

use super::{
    default_plugin_version, default_queue_capacity, default_request_body_max_size_bytes,
    default_request_timeout_ms,
};

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources win: global file, then explicit file, then environment.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default(
            "request_body_max_size_bytes",
            default_request_body_max_size_bytes() as i64,
        )?
        .set_default("telemetry.plugin_version", default_plugin_version())?
        .set_default("telemetry.queue_capacity", default_queue_capacity() as i64)?
        .set_default(
            "telemetry.request_timeout_ms",
            default_request_timeout_ms() as i64,
        )
}
