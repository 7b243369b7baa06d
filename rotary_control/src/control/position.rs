//! Outer loop: position error → velocity setpoint.
//!
//! Output is unclamped: it is a velocity setpoint for the speed loop, not
//! an actuator command.

use rotary_common::error::ParamError;
use rotary_common::params::PidParams;
use rotary_common::status::PositionStatus;
use tracing::{debug, trace};

use super::pid::PidCore;

/// Position PID producing a velocity reference [deg/s].
#[derive(Debug, Clone, Copy)]
pub struct PositionControllerPid {
    core: PidCore,
}

impl PositionControllerPid {
    /// # Errors
    /// [`ParamError`] on invalid gains, limit or deadband.
    pub fn new(params: PidParams) -> Result<Self, ParamError> {
        debug!(
            "PositionControllerPid: kp={} ki={} kd={} limit={} deadband={}",
            params.kp, params.ki, params.kd, params.integral_limit, params.deadband
        );
        Ok(Self {
            core: PidCore::new(params)?,
        })
    }

    /// Run one control cycle.
    ///
    /// # Arguments
    /// - `pos_ref`: Reference position [deg].
    /// - `pos_real`: Measured position [deg].
    /// - `dt`: Cycle period [s]. `dt <= 0` zeroes the derivative.
    pub fn update(&mut self, pos_ref: f64, pos_real: f64, dt: f64) -> PositionStatus {
        let step = self.core.advance(pos_ref - pos_real, dt);
        let params = self.core.params();

        let p_term = params.kp * step.error;
        let i_term = params.ki * step.integral;
        let d_term = params.kd * step.derivative;
        let vel_ref = p_term + i_term + d_term;

        trace!(
            "Position loop: err={:.4}, P={:.4}, I={:.4}, D={:.4}, vel_ref={:.4}",
            step.error, p_term, i_term, d_term, vel_ref
        );

        PositionStatus {
            vel_ref,
            error: step.error,
            p_term,
            i_term,
            d_term,
            flags: step.flags,
        }
    }

    /// Current integral accumulator.
    #[inline]
    pub fn integral(&self) -> f64 {
        self.core.state().integral()
    }

    #[inline]
    pub fn params(&self) -> &PidParams {
        self.core.params()
    }

    /// Equivalent to re-creating the controller with the same gains.
    #[inline]
    pub fn reset(&mut self) {
        self.core.reset();
    }
}
