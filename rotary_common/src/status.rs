//! Per-step status records.
//!
//! Read-only snapshots handed to logging and plotting collaborators.
//! Controllers return them and never keep them.

use bitflags::bitflags;
use static_assertions::const_assert_eq;

bitflags! {
    /// Conditions hit during one controller update.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PidFlags: u8 {
        /// Error was inside the deadband and forced to zero.
        const DEADBAND          = 0x01;
        /// Integral accumulator sat on its limit.
        const INTEGRAL_CLAMPED  = 0x02;
        /// Output was clamped to the actuator range.
        const OUTPUT_SATURATED  = 0x04;
    }
}

impl Default for PidFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Motor state after one update (5 × f64 = 40 bytes).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct MotorSnapshot {
    /// Wrapped position [deg], in `[0, 360)`.
    pub position_deg: f64,
    /// Multi-turn position [deg].
    pub position_unwrapped_deg: f64,
    /// Angular velocity [deg/s].
    pub velocity_deg_s: f64,
    /// Applied throttle, in `[0, 1]`.
    pub throttle: f64,
    /// Net torque of the last update [Nm].
    pub net_torque: f64,
}

const_assert_eq!(core::mem::size_of::<MotorSnapshot>(), 40);

impl Default for MotorSnapshot {
    fn default() -> Self {
        Self {
            position_deg: 0.0,
            position_unwrapped_deg: 0.0,
            velocity_deg_s: 0.0,
            throttle: 0.0,
            net_torque: 0.0,
        }
    }
}

impl MotorSnapshot {
    /// Returns true if all fields are finite (not NaN, not Inf).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position_deg.is_finite()
            && self.position_unwrapped_deg.is_finite()
            && self.velocity_deg_s.is_finite()
            && self.throttle.is_finite()
            && self.net_torque.is_finite()
    }
}

/// Outer loop result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionStatus {
    /// Velocity setpoint for the inner loop [deg/s], unclamped.
    pub vel_ref: f64,
    /// Position error after the deadband [deg].
    pub error: f64,
    /// `kp · error`.
    pub p_term: f64,
    /// `ki · integral`.
    pub i_term: f64,
    /// `kd · derivative`.
    pub d_term: f64,
    pub flags: PidFlags,
}

/// Inner loop result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedStatus {
    /// Velocity estimate from the encoder [deg/s].
    pub measured_velocity: f64,
    /// Velocity error after the deadband [deg/s].
    pub error: f64,
    pub p_term: f64,
    pub i_term: f64,
    /// `kd · smoothed derivative`.
    pub d_term: f64,
    /// Throttle written to the motor, in `[0, 1]`.
    pub throttle: f64,
    pub flags: PidFlags,
}

impl PositionStatus {
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.vel_ref.is_finite()
            && self.error.is_finite()
            && self.p_term.is_finite()
            && self.i_term.is_finite()
            && self.d_term.is_finite()
    }
}

impl SpeedStatus {
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.measured_velocity.is_finite()
            && self.error.is_finite()
            && self.p_term.is_finite()
            && self.i_term.is_finite()
            && self.d_term.is_finite()
            && self.throttle.is_finite()
    }
}
