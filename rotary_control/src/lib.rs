//! # Rotary Control Library
//!
//! Closed-loop simulation of a single rotary actuator, used to design and
//! validate motor-control tuning before it reaches hardware.
//!
//! ## Signal flow (one fixed step)
//!
//! 1. **Planner**: trapezoidal reference position/velocity
//! 2. **Position loop**: position error → velocity setpoint
//! 3. **Speed loop**: encoder velocity estimate → throttle
//! 4. **Motor**: throttle + disturbance → velocity, position
//!
//! The encoder observes the motor and closes the loop into step 3.
//!
//! ## Ownership
//!
//! Every component is a plain struct owned by the caller and advanced
//! through `&mut self`. No globals, no locking, no I/O during a step.
//! Runs are bit-reproducible given a fixed encoder noise seed.

pub mod config;
pub mod control;
pub mod error;
pub mod planner;
pub mod plant;
pub mod sim;
