//! Assemble a complete [`Simulation`] from a validated configuration.

use std::path::Path;

use rotary_common::config::load_simulation_config;
use rotary_common::params::SimulationConfig;
use tracing::info;

use crate::control::{PositionControllerPid, SpeedControllerPid, VelocityFilter};
use crate::error::SimError;
use crate::planner::TrapezoidalPlanner;
use crate::plant::encoder::Encoder;
use crate::plant::motor::RotaryMotor;
use crate::sim::driver::Simulation;

/// Build a seeded run: same config and seed, bit-identical steps.
///
/// The motor starts at rest at the profile's start angle.
///
/// # Errors
/// [`SimError::Param`] if any section is invalid.
pub fn build_simulation(config: &SimulationConfig, seed: u64) -> Result<Simulation, SimError> {
    config.validate()?;

    let planner = TrapezoidalPlanner::from_params(&config.planner)?;
    let mut motor = RotaryMotor::new(config.motor)?;
    motor.reset(planner.start().to_radians());

    let encoder = Encoder::seeded(&config.encoder, seed)?;
    let velocity_filter = config
        .velocity_filter
        .as_ref()
        .map(VelocityFilter::from_params)
        .transpose()?;

    let position = PositionControllerPid::new(config.position_pid)?;
    let speed = SpeedControllerPid::new(config.speed_pid, encoder, velocity_filter)?;

    info!(
        "Simulation built: {} -> {} deg over {:.3}s, seed {}",
        planner.start(),
        planner.target(),
        planner.duration(),
        seed
    );

    Ok(Simulation::new(
        planner,
        motor,
        position,
        speed,
        config.dt,
        config.stop,
    )?)
}

/// Load, validate and assemble in one call.
///
/// # Errors
/// [`SimError::Config`] if the file cannot be read or parsed,
/// [`SimError::Param`] if it is invalid.
pub fn load_simulation(path: &Path, seed: u64) -> Result<Simulation, SimError> {
    let config = load_simulation_config(path)?;
    build_simulation(&config, seed)
}

// ─── Tests ──────────────────────────────────────────────────────────
