//! Config loading facade.

use std::path::Path;

use config::File;

use super::merge::builder_with_defaults;
use super::sources::{environment, global_file};
use super::CallsConfig;
use crate::error::ApiError;

/// Loads [`CallsConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load with full precedence: defaults, global file, `config_path` if
    /// given, then environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<CallsConfig, ApiError> {
        let mut builder = builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = environment::add_to_builder(builder);
        let config = builder.build()?.try_deserialize::<CallsConfig>()?;
        Ok(config)
    }

    /// Load defaults plus a single file. Ignores global file and environment.
    pub fn load_from_file(path: &Path) -> Result<CallsConfig, ApiError> {
        let config = builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize::<CallsConfig>()?;
        Ok(config)
    }

    /// Load and reject configurations that fail validation.
    pub fn load_validated(config_path: Option<&Path>) -> Result<CallsConfig, ApiError> {
        let config = Self::load(config_path)?;
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(config)
    }
}
