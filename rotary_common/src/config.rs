//! Configuration loading traits and types.
//!
//! Loads component parameters from TOML. Loading is read-only: tuning
//! parameters are never written back.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rotary_common::config::{ConfigError, load_simulation_config};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = load_simulation_config(Path::new("tuning.toml"))?;
//!     println!("dt = {}", config.dt);
//!     Ok(())
//! }
//! ```

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::error::ParamError;
use crate::params::SimulationConfig;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// Reading the file failed for a reason other than absence.
    #[error("Failed to read configuration: {0}")]
    Io(String),

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A component parameter is outside its domain.
    #[error("Invalid parameter: {0}")]
    Param(#[from] ParamError),
}

/// Trait for loading configuration from TOML.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::Io(e.to_string())
            }
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Load a [`SimulationConfig`] and validate every component.
pub fn load_simulation_config(path: &Path) -> Result<SimulationConfig, ConfigError> {
    let config = SimulationConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate a [`SimulationConfig`] from a TOML string.
pub fn simulation_config_from_str(content: &str) -> Result<SimulationConfig, ConfigError> {
    let config = SimulationConfig::from_toml_str(content)?;
    config.validate()?;
    Ok(config)
}
