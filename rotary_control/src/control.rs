//! Control engine root.
//!
//! Cascaded PID: the position loop turns position error into a velocity
//! setpoint, the speed loop turns velocity error into throttle. Both share
//! the [`pid`] core; [`filters`] smooths the speed loop's measurement.

pub mod filters;
pub mod pid;
pub mod position;
pub mod speed;

pub use filters::{Exponential, MovingAverage, SignalFilter, VelocityFilter};
pub use pid::{PidCore, PidState, PidStep, pid_advance};
pub use position::PositionControllerPid;
pub use speed::{SpeedControllerPid, shortest_angle_delta};
