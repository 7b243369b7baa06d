//! Fixed-step simulation runners.
//!
//! - [`driver`]: the closed cascade (planner → position loop → speed loop
//!   → motor, encoder feedback) with settling detection.
//! - [`open_loop`]: a motor driven by a precomputed throttle signal.

pub mod driver;
pub mod open_loop;

pub use driver::{RunSummary, Simulation, StepRecord};
pub use open_loop::{OpenLoopParams, OpenLoopReport, simulate_motor, throttle_ramp};
