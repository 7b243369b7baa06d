//! Numeric constants shared by the simulator crates.
//!
//! Single source of truth for thresholds and limits.

use core::f64::consts::TAU;

/// One full revolution [rad].
pub const FULL_TURN_RAD: f64 = TAU;

/// One full revolution [deg].
pub const FULL_TURN_DEG: f64 = 360.0;

/// Half a revolution [deg]. Deltas beyond this are taken the short way round.
pub const HALF_TURN_DEG: f64 = 180.0;

/// Speed below which the shaft is treated as stationary for friction [rad/s].
pub const STATIONARY_VELOCITY_RAD_S: f64 = 1e-4;

/// Capacity of the moving-average history buffer, and so the largest
/// window it accepts.
pub const MAX_FILTER_WINDOW: usize = 64;

/// Default simulation step [s].
pub const DEFAULT_DT: f64 = 0.01;

/// Wrap an angle into `[0, period)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `period`;
/// that case folds back to zero.
#[inline]
pub fn wrap_angle(value: f64, period: f64) -> f64 {
    let wrapped = value.rem_euclid(period);
    if wrapped >= period { 0.0 } else { wrapped }
}
