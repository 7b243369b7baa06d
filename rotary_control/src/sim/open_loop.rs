//! Open-loop motor runs: a precomputed throttle signal, no controllers.
//!
//! Used to characterise the plant (spin-up, coast-down, friction lock)
//! independently of any tuning.

use rotary_common::consts::DEFAULT_DT;
use rotary_common::error::{ParamError, ensure_non_negative, ensure_positive};
use rotary_common::status::MotorSnapshot;
use serde::Serialize;
use tracing::{debug, trace};

use crate::plant::motor::RotaryMotor;

/// Stepping and early-stop settings for [`simulate_motor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenLoopParams {
    /// Fixed step [s].
    pub dt: f64,
    /// Steps starting after this time are not run [s].
    pub max_time: f64,
    /// Stop once |throttle| and |velocity [deg/s]| are both within this.
    pub velocity_epsilon: f64,
    /// Early stop is only considered after this many steps.
    pub min_steps: usize,
}

impl Default for OpenLoopParams {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            max_time: 30.0,
            velocity_epsilon: 1e-3,
            min_steps: 10,
        }
    }
}

impl OpenLoopParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ensure_positive("dt", self.dt)?;
        ensure_non_negative("max_time", self.max_time)?;
        ensure_non_negative("velocity_epsilon", self.velocity_epsilon)?;
        Ok(())
    }
}

/// Outcome of [`simulate_motor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpenLoopReport {
    pub steps: usize,
    /// Time at the start of the last step run [s].
    pub last_time: f64,
    /// Stopped because the motor came to rest with zero throttle.
    pub came_to_rest: bool,
}

/// Drive `motor` with one throttle sample per step.
///
/// Each step sets the throttle, updates the motor and reports
/// `(t, snapshot)` to `observer`. Stops at the end of the signal, when
/// `t` exceeds `max_time`, or once past `min_steps` with throttle and
/// velocity both within `velocity_epsilon` of zero.
///
/// # Errors
/// [`ParamError`] if `params` is invalid; the motor is not touched.
pub fn simulate_motor<F>(
    motor: &mut RotaryMotor,
    throttle_signal: &[f64],
    params: &OpenLoopParams,
    mut observer: F,
) -> Result<OpenLoopReport, ParamError>
where
    F: FnMut(f64, &MotorSnapshot),
{
    params.validate()?;
    debug!(
        "Open-loop run: {} samples, dt={}s, max_time={}s",
        throttle_signal.len(),
        params.dt,
        params.max_time
    );

    let mut report = OpenLoopReport {
        steps: 0,
        last_time: 0.0,
        came_to_rest: false,
    };

    for (step, &throttle) in throttle_signal.iter().enumerate() {
        let t = step as f64 * params.dt;
        if t > params.max_time {
            break;
        }

        motor.set_throttle(throttle);
        motor.update(params.dt);
        let snapshot = motor.snapshot();
        observer(t, &snapshot);

        report.steps = step + 1;
        report.last_time = t;

        if step > params.min_steps
            && snapshot.throttle.abs() <= params.velocity_epsilon
            && snapshot.velocity_deg_s.abs() <= params.velocity_epsilon
        {
            trace!("Open-loop run at rest after {} steps", step + 1);
            report.came_to_rest = true;
            break;
        }
    }

    Ok(report)
}

/// Ramp from 0 to `peak`, hold, ramp back to 0.
///
/// Each ramp has `ramp_steps` samples including both end points; a single
/// sample ramp is just its start value.
pub fn throttle_ramp(ramp_steps: usize, hold_steps: usize, peak: f64) -> Vec<f64> {
    let ramp = |from: f64, to: f64| {
        (0..ramp_steps).map(move |i| {
            if ramp_steps == 1 {
                from
            } else {
                from + (to - from) * i as f64 / (ramp_steps - 1) as f64
            }
        })
    };

    ramp(0.0, peak)
        .chain(std::iter::repeat_n(peak, hold_steps))
        .chain(ramp(peak, 0.0))
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────
