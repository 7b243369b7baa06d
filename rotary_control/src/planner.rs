//! Trapezoidal motion profile between two angles.
//!
//! Constant acceleration up to the cruise velocity, cruise, then constant
//! deceleration to rest at the target. A move too short to reach `vmax`
//! degrades to a triangular profile with a reduced peak velocity; the
//! distance is always covered exactly.
//!
//! The planner is immutable after construction and [`get_ref`] is a pure
//! function of time, so it can be queried at any `t` in any order.
//!
//! [`get_ref`]: TrapezoidalPlanner::get_ref

use rotary_common::error::ParamError;
use rotary_common::params::PlannerParams;
use tracing::debug;

/// Reference sample of the profile at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct ProfilePoint {
    /// Reference position [deg].
    pub position: f64,
    /// Reference velocity [deg/s].
    pub velocity: f64,
    /// Reference acceleration [deg/s²].
    pub acceleration: f64,
}

/// Precomputed trapezoidal (or triangular) profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapezoidalPlanner {
    pos0: f64,
    posf: f64,
    amax: f64,
    /// +1 or −1; equal endpoints count as positive.
    direction: f64,
    distance: f64,
    /// Velocity actually reached (≤ requested vmax).
    peak_velocity: f64,
    accel_time: f64,
    accel_distance: f64,
    cruise_time: f64,
    duration: f64,
    triangular: bool,
}

impl TrapezoidalPlanner {
    /// Build the profile from `pos0` to `posf` [deg].
    ///
    /// # Errors
    /// [`ParamError`] if `vmax` or `amax` is not strictly positive, or an
    /// endpoint is not finite.
    pub fn new(pos0: f64, posf: f64, vmax: f64, amax: f64) -> Result<Self, ParamError> {
        Self::from_params(&PlannerParams {
            pos0,
            posf,
            vmax,
            amax,
        })
    }

    /// # Errors
    /// See [`TrapezoidalPlanner::new`].
    pub fn from_params(params: &PlannerParams) -> Result<Self, ParamError> {
        params.validate()?;
        let PlannerParams {
            pos0,
            posf,
            vmax,
            amax,
        } = *params;

        let direction = if posf >= pos0 { 1.0 } else { -1.0 };
        let distance = (posf - pos0).abs();

        let mut accel_time = vmax / amax;
        let mut accel_distance = 0.5 * amax * accel_time * accel_time;
        let (peak_velocity, cruise_time, triangular) = if 2.0 * accel_distance < distance {
            (vmax, (distance - 2.0 * accel_distance) / vmax, false)
        } else {
            accel_time = (distance / amax).sqrt();
            accel_distance = 0.5 * amax * accel_time * accel_time;
            (amax * accel_time, 0.0, true)
        };
        let duration = 2.0 * accel_time + cruise_time;

        debug!(
            "TrapezoidalPlanner: {pos0} -> {posf} deg, D={distance:.3}, Ta={accel_time:.4}s, \
             Tc={cruise_time:.4}s, Tf={duration:.4}s, v_peak={peak_velocity:.3}, triangular={triangular}"
        );

        Ok(Self {
            pos0,
            posf,
            amax,
            direction,
            distance,
            peak_velocity,
            accel_time,
            accel_distance,
            cruise_time,
            duration,
            triangular,
        })
    }

    /// Reference position, velocity and acceleration at time `t` [s].
    pub fn get_ref(&self, t: f64) -> ProfilePoint {
        if t < 0.0 {
            return ProfilePoint {
                position: self.pos0,
                ..ProfilePoint::default()
            };
        }
        if t >= self.duration {
            return ProfilePoint {
                position: self.posf,
                ..ProfilePoint::default()
            };
        }

        let a = self.amax;
        let v = self.peak_velocity;
        let cruise_end = self.accel_time + self.cruise_time;

        // (distance travelled, speed, acceleration) along the direction of travel
        let (s, speed, accel) = if t < self.accel_time {
            (0.5 * a * t * t, a * t, a)
        } else if t < cruise_end {
            (self.accel_distance + v * (t - self.accel_time), v, 0.0)
        } else {
            let tau = t - cruise_end;
            (
                self.accel_distance + v * self.cruise_time + v * tau - 0.5 * a * tau * tau,
                v - a * tau,
                -a,
            )
        };

        ProfilePoint {
            position: self.pos0 + self.direction * s,
            velocity: self.direction * speed,
            acceleration: self.direction * accel,
        }
    }

    // ─── Profile accessors ──────────────────────────────────────────

    #[inline]
    pub fn start(&self) -> f64 {
        self.pos0
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.posf
    }

    /// Ramp-up (and ramp-down) duration Ta [s].
    #[inline]
    pub fn accel_time(&self) -> f64 {
        self.accel_time
    }

    /// Constant-velocity duration Tc [s]; 0 for a triangular profile.
    #[inline]
    pub fn cruise_time(&self) -> f64 {
        self.cruise_time
    }

    /// Total duration Tf = 2·Ta + Tc [s].
    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn peak_velocity(&self) -> f64 {
        self.peak_velocity
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn is_triangular(&self) -> bool {
        self.triangular
    }

    /// True once the reference holds at the target.
    #[inline]
    pub fn is_complete(&self, t: f64) -> bool {
        t >= self.duration
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
