//! Rotary Common Library
//!
//! Shared types for the rotary actuator simulator workspace: construction
//! parameters for every component, per-step status records, parameter
//! validation errors and TOML configuration loading.
//!
//! # Module Structure
//!
//! - [`consts`] - Physical and numeric constants
//! - [`error`] - Parameter validation errors
//! - [`params`] - Construction-time parameters for every component
//! - [`status`] - Read-only per-step snapshots and diagnostic flags
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use rotary_common::prelude::*;
//!
//! let motor = MotorParams::new(0.01, 0.001, 1.0);
//! assert!(motor.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod params;
pub mod prelude;
pub mod status;
