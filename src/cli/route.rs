//! CLI route: single route table and run context. Dispatches to the
//! telemetry API and presentation.

use crate::api::TelemetryApi;
use crate::config::{CallsConfig, ConfigLoader};
use crate::error::ApiError;
use crate::telemetry::sinks::HttpClientFactory;
use crate::watch::{ConfigWatcher, WatchConfig};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{format_registry_text, format_status_text, format_validation_text};

/// Runtime context for CLI execution: loaded configuration and the
/// telemetry API built from it.
pub struct RunContext {
    config: CallsConfig,
    config_path: Option<PathBuf>,
    api: TelemetryApi,
}

impl RunContext {
    /// Load configuration and build a disabled API backed by the HTTP sink.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        let factory = Arc::new(HttpClientFactory::new(config.telemetry.sink_options()));
        let api = TelemetryApi::new(factory, config.request_body_max_size_bytes);
        Ok(Self::with_api(config, config_path, api))
    }

    /// Build a context around an existing API.
    pub fn with_api(config: CallsConfig, config_path: Option<PathBuf>, api: TelemetryApi) -> Self {
        Self {
            config,
            config_path,
            api,
        }
    }

    pub fn api(&self) -> &TelemetryApi {
        &self.api
    }

    pub fn config(&self) -> &CallsConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Status { format } => {
                self.apply_config()?;
                let status = self.api.manager().status();
                if format == "json" {
                    serde_json::to_string_pretty(&status)
                        .map_err(|e| ApiError::ConfigError(e.to_string()))
                } else {
                    Ok(format_status_text(&status))
                }
            }
            Commands::Events => Ok(format_registry_text()),
            Commands::Config { command } => match command {
                ConfigCommands::Show => toml::to_string_pretty(&self.config.redacted())
                    .map_err(|e| ApiError::ConfigError(e.to_string())),
                ConfigCommands::Validate => Ok(format_validation_text(&self.config.validate())),
            },
            Commands::Track { user_id, input } => {
                self.apply_config()?;
                let result = match input {
                    Some(path) => self.replay(std::fs::File::open(path)?, user_id),
                    None => self.replay(std::io::stdin().lock(), user_id),
                };
                // Close the sink so queued events are delivered before exit.
                self.api.manager().disable()?;
                result
            }
            Commands::Watch { debounce_ms } => {
                let config_path = self.config_path.clone().ok_or_else(|| {
                    ApiError::ConfigError("watch requires --config <path>".to_string())
                })?;
                let watcher = ConfigWatcher::new(
                    self.api.clone(),
                    WatchConfig {
                        config_path,
                        debounce_ms: *debounce_ms,
                    },
                );
                watcher.start()?;
                Ok("Watch stopped".to_string())
            }
        }
    }

    fn apply_config(&self) -> Result<(), ApiError> {
        self.config.validate().map_err(|errors| {
            ApiError::ConfigError(format_validation_text(&Err(errors)))
        })?;
        self.api.on_configuration_change(&self.config)?;
        Ok(())
    }

    /// Feed each non-empty line to the track handler; one JSON response per line.
    fn replay(&self, input: impl Read, user_id: &str) -> Result<String, ApiError> {
        let mut responses = Vec::new();
        for line in BufReader::new(input).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.api.handle_track_event(line.as_bytes(), user_id);
            responses.push(
                serde_json::to_string(&response)
                    .map_err(|e| ApiError::ConfigError(e.to_string()))?,
            );
        }
        info!(count = responses.len(), "Replayed track events");
        Ok(responses.join("\n"))
    }
}
