//! Rotary motor physics.
//!
//! Single rigid rotor driven by a throttle-proportional torque against
//! viscous and Coulomb friction plus an external disturbance. Integrated
//! with semi-implicit Euler at a fixed step:
//!
//! ```text
//! τ_net = τ_max·u − b·ω + τ_coulomb + τ_ext
//! ω    += τ_net / J · dt
//! θ    += ω · dt        (wrapped to [0, 2π) and unwrapped)
//! ```
//!
//! Near standstill (|ω| ≤ 1e-4 rad/s) friction switches to the static
//! regime: if the applied torque does not exceed the Coulomb limit the
//! shaft is held (net torque and velocity zero); otherwise it breaks away
//! against the full Coulomb torque.
//!
//! The lock only engages when a step lands inside that band. With Coulomb
//! friction alone, each kinetic step changes ω by `c/J·dt`; once that is
//! wider than the band, a coasting rotor can overshoot zero forever and
//! settle into a limit cycle (e.g. J = 0.01, c = 0.05, dt = 0.01 swings
//! by 0.05 rad/s per step). Some viscous friction, or a smaller `dt`,
//! lets it reach rest; `simulate_motor` otherwise reports
//! `came_to_rest = false`.

use rotary_common::consts::{
    FULL_TURN_DEG, FULL_TURN_RAD, STATIONARY_VELOCITY_RAD_S, wrap_angle,
};
use rotary_common::error::ParamError;
use rotary_common::params::MotorParams;
use rotary_common::status::MotorSnapshot;
use tracing::{debug, trace};

use super::Motor;

/// Rotary plant state.
#[derive(Debug, Clone)]
pub struct RotaryMotor {
    /// Physical parameters (fixed for the run except the disturbance).
    params: MotorParams,
    /// Throttle in `[0, 1]`.
    throttle: f64,
    /// Wrapped angle [rad], in `[0, 2π)`.
    position: f64,
    /// Multi-turn angle [rad].
    position_unwrapped: f64,
    /// Angular velocity [rad/s].
    velocity: f64,
    /// Net torque of the last update [Nm].
    last_net_torque: f64,
}

impl RotaryMotor {
    /// Create a motor at rest at angle zero.
    ///
    /// # Errors
    /// [`ParamError`] if inertia is not positive or any coefficient is
    /// negative or non-finite.
    pub fn new(params: MotorParams) -> Result<Self, ParamError> {
        params.validate()?;
        debug!(
            "RotaryMotor: J={} b={} c={} tau_max={} tau_ext={}",
            params.inertia,
            params.friction_viscous,
            params.friction_coulomb,
            params.max_torque,
            params.external_torque
        );
        Ok(Self {
            params,
            throttle: 0.0,
            position: 0.0,
            position_unwrapped: 0.0,
            velocity: 0.0,
            last_net_torque: 0.0,
        })
    }

    #[inline]
    pub fn params(&self) -> &MotorParams {
        &self.params
    }

    /// Return to rest at `position_rad`, throttle and torque cleared.
    pub fn reset(&mut self, position_rad: f64) {
        self.reset_to(position_rad, 0.0);
    }

    /// Place the rotor at `position_rad` spinning at `velocity_rad_s`.
    pub fn reset_to(&mut self, position_rad: f64, velocity_rad_s: f64) {
        self.position = wrap_angle(position_rad, FULL_TURN_RAD);
        self.position_unwrapped = position_rad;
        self.velocity = velocity_rad_s;
        self.throttle = 0.0;
        self.last_net_torque = 0.0;
    }

    /// Change the external disturbance torque [Nm] mid-run.
    ///
    /// Non-finite values are ignored.
    pub fn set_external_torque(&mut self, torque: f64) {
        if torque.is_finite() {
            self.params.external_torque = torque;
        }
    }

    /// Store the throttle, silently clamped to `[0, 1]`.
    #[inline]
    pub fn set_throttle(&mut self, throttle: f64) {
        self.throttle = if throttle.is_nan() {
            0.0
        } else {
            throttle.clamp(0.0, 1.0)
        };
    }

    #[inline]
    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    /// Friction torque for the current velocity and applied torque.
    ///
    /// Returns `(viscous, coulomb, held)`.
    fn friction(&self, applied: f64) -> (f64, f64, bool) {
        let viscous = -self.params.friction_viscous * self.velocity;
        let limit = self.params.friction_coulomb;

        if self.velocity.abs() > STATIONARY_VELOCITY_RAD_S {
            // Kinetic regime.
            (viscous, -limit * self.velocity.signum(), false)
        } else if applied.abs() > limit {
            // Breakaway.
            (viscous, -limit * applied.signum(), false)
        } else {
            // Static lock: friction cancels the applied torque exactly.
            (0.0, -applied, true)
        }
    }

    /// Advance the physical state by one step of `dt` seconds.
    ///
    /// Non-positive or non-finite `dt` leaves the state untouched.
    pub fn update(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let drive = self.params.max_torque * self.throttle;
        let external = self.params.external_torque;
        let (viscous, coulomb, held) = self.friction(drive + external);

        let net_torque = drive + viscous + coulomb + external;
        self.last_net_torque = net_torque;

        if held {
            self.velocity = 0.0;
        } else {
            let angular_acc = net_torque / self.params.inertia;
            self.velocity += angular_acc * dt;
        }

        let step = self.velocity * dt;
        self.position = wrap_angle(self.position + step, FULL_TURN_RAD);
        self.position_unwrapped += step;

        trace!(
            "Motor: u={:.3}, tau_net={:.5}, vel={:.4} rad/s, pos={:.4} rad, held={}",
            self.throttle,
            net_torque,
            self.velocity,
            self.position,
            held
        );
    }

    /// Wrapped angle [rad], in `[0, 2π)`.
    #[inline]
    pub fn position_rad(&self) -> f64 {
        self.position
    }

    /// Multi-turn angle [rad].
    #[inline]
    pub fn position_unwrapped_rad(&self) -> f64 {
        self.position_unwrapped
    }

    /// Angular velocity [rad/s].
    #[inline]
    pub fn velocity_rad_s(&self) -> f64 {
        self.velocity
    }

    /// Wrapped angle [deg], in `[0, 360)`.
    #[inline]
    pub fn position_deg(&self) -> f64 {
        // Conversion rounding can land a value just below 2π on 360.
        wrap_angle(self.position.to_degrees(), FULL_TURN_DEG)
    }

    /// Multi-turn angle [deg].
    #[inline]
    pub fn position_unwrapped_deg(&self) -> f64 {
        self.position_unwrapped.to_degrees()
    }

    /// Angular velocity [deg/s].
    #[inline]
    pub fn velocity_deg_s(&self) -> f64 {
        self.velocity.to_degrees()
    }

    /// Net torque of the last update [Nm].
    #[inline]
    pub fn last_net_torque(&self) -> f64 {
        self.last_net_torque
    }

    /// Read-only view of the current state.
    pub fn snapshot(&self) -> MotorSnapshot {
        MotorSnapshot {
            position_deg: self.position_deg(),
            position_unwrapped_deg: self.position_unwrapped_deg(),
            velocity_deg_s: self.velocity_deg_s(),
            throttle: self.throttle,
            net_torque: self.last_net_torque,
        }
    }
}

impl Motor for RotaryMotor {
    fn set_throttle(&mut self, throttle: f64) {
        RotaryMotor::set_throttle(self, throttle);
    }

    fn throttle(&self) -> f64 {
        self.throttle
    }

    fn update(&mut self, dt: f64) {
        RotaryMotor::update(self, dt);
    }

    fn position_deg(&self) -> f64 {
        RotaryMotor::position_deg(self)
    }

    fn velocity_deg_s(&self) -> f64 {
        RotaryMotor::velocity_deg_s(self)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
