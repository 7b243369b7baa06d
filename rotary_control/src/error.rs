//! Error module root.
//!
//! Construction is the only fallible phase: a bad parameter surfaces as
//! [`ParamError`], a bad file as [`ConfigError`]. Stepping never fails.

use thiserror::Error;

pub use rotary_common::config::ConfigError;
pub use rotary_common::error::ParamError;

/// Failure while assembling a simulation.
#[derive(Debug, Clone, Error)]
pub enum SimError {
    /// A component rejected its parameters.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
