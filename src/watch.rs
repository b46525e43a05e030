//! Configuration Watcher
//!
//! Watches the configuration file and re-applies it on change, so the
//! diagnostics flag toggles the analytics sink without a restart.

use crate::api::TelemetryApi;
use crate::config::ConfigLoader;
use crate::error::ApiError;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watch mode configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Configuration file to watch
    pub config_path: PathBuf,
    /// Quiet period after the last change before reloading
    pub debounce_ms: u64,
}

impl WatchConfig {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            debounce_ms: 250,
        }
    }
}

pub struct ConfigWatcher {
    api: TelemetryApi,
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
}

impl ConfigWatcher {
    pub fn new(api: TelemetryApi, config: WatchConfig) -> Self {
        Self {
            api,
            config,
            running: Arc::new(RwLock::new(true)),
        }
    }

    /// Ask a running [`start`](Self::start) loop to return.
    pub fn stop(&self) {
        *self.running.write() = false;
    }

    /// Load, validate and apply the watched file once.
    pub fn reload(&self) -> Result<(), ApiError> {
        let config = ConfigLoader::load_validated(Some(&self.config.config_path))?;
        self.api.on_configuration_change(&config)?;
        info!(
            diagnostics_enabled = config.diagnostics_enabled(),
            "Configuration applied"
        );
        Ok(())
    }

    fn reload_best_effort(&self) {
        if let Err(e) = self.reload() {
            error!(error = %e, "Failed to apply configuration; keeping previous state");
        }
    }

    /// Apply the file, then block re-applying it on every change until
    /// [`stop`](Self::stop) is called or the watcher disconnects.
    pub fn start(&self) -> Result<(), ApiError> {
        self.reload_best_effort();

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })?;

        // Editors often replace the file, so watch its directory.
        let watch_dir = self
            .config
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;
        info!(config = ?self.config.config_path, "Watching configuration");

        let debounce = Duration::from_millis(self.config.debounce_ms);
        let mut pending_since: Option<Instant> = None;

        loop {
            if !*self.running.read() {
                break;
            }

            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => {
                    if is_relevant(&event, &self.config.config_path) {
                        pending_since = Some(Instant::now());
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }

            if pending_since.is_some_and(|since| since.elapsed() >= debounce) {
                pending_since = None;
                self.reload_best_effort();
            }
        }

        Ok(())
    }
}

/// Whether `event` touches the file at `config_path`.
fn is_relevant(event: &Event, config_path: &Path) -> bool {
    let touches_content = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    let Some(file_name) = config_path.file_name() else {
        return false;
    };
    touches_content
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name))
}
