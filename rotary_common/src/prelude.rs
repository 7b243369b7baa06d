//! Prelude module for common re-exports.
//!
//! ```rust
//! use rotary_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, load_simulation_config};

// ─── Parameters ─────────────────────────────────────────────────────
pub use crate::error::ParamError;
pub use crate::params::{
    EncoderParams, FilterParams, MotorParams, PidParams, PlannerParams, SimulationConfig,
    SpeedPidParams, StopParams,
};

// ─── Status records ─────────────────────────────────────────────────
pub use crate::status::{MotorSnapshot, PidFlags, PositionStatus, SpeedStatus};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{DEFAULT_DT, MAX_FILTER_WINDOW};
