//! PID core shared by the position and speed loops.
//!
//! Deadband on the error, forward-Euler integral with symmetric clamp
//! (anti-windup), backward-difference derivative. The loops weight the
//! terms themselves; the speed loop smooths the derivative first.
//!
//! Zero Ki disables integral action; zero Kd disables derivative action.

use rotary_common::error::ParamError;
use rotary_common::params::PidParams;
use rotary_common::status::PidFlags;

/// Internal state of the PID core.
///
/// Preserves the integral accumulator and previous error across cycles.
#[derive(Debug, Clone, Copy, Default)]
pub struct PidState {
    /// Integral accumulator, always within `[-limit, +limit]`.
    integral: f64,
    /// Previous (post-deadband) error, for the derivative.
    prev_error: f64,
}

impl PidState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    #[inline]
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}

/// Unweighted result of one PID core cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidStep {
    /// Error after the deadband.
    pub error: f64,
    /// Clamped integral accumulator.
    pub integral: f64,
    /// Raw derivative of the error (0 when `dt <= 0`).
    pub derivative: f64,
    pub flags: PidFlags,
}

/// Advance the PID core by one cycle.
///
/// # Arguments
/// - `state`: Mutable integral / previous-error state.
/// - `params`: Gains, integral limit and deadband.
/// - `raw_error`: Setpoint minus measurement.
/// - `dt`: Cycle period [s].
#[inline]
pub fn pid_advance(state: &mut PidState, params: &PidParams, raw_error: f64, dt: f64) -> PidStep {
    let mut flags = PidFlags::empty();

    // ── Deadband ────────────────────────────────────────────
    let error = if raw_error.abs() < params.deadband {
        flags |= PidFlags::DEADBAND;
        0.0
    } else {
        raw_error
    };

    // ── Integral with anti-windup clamp ─────────────────────
    let limit = params.integral_limit;
    let unclamped = state.integral + error * dt;
    let integral = unclamped.clamp(-limit, limit);
    if integral != unclamped {
        flags |= PidFlags::INTEGRAL_CLAMPED;
    }
    state.integral = integral;

    // ── Derivative ──────────────────────────────────────────
    let derivative = if dt > 0.0 {
        (error - state.prev_error) / dt
    } else {
        0.0
    };
    state.prev_error = error;

    PidStep {
        error,
        integral,
        derivative,
        flags,
    }
}

/// Parameters plus state: the reusable PID building block.
#[derive(Debug, Clone, Copy)]
pub struct PidCore {
    params: PidParams,
    state: PidState,
}

impl PidCore {
    /// # Errors
    /// [`ParamError`] on non-finite gains or a negative limit/deadband.
    pub fn new(params: PidParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            params,
            state: PidState::default(),
        })
    }

    #[inline]
    pub fn advance(&mut self, raw_error: f64, dt: f64) -> PidStep {
        pid_advance(&mut self.state, &self.params, raw_error, dt)
    }

    #[inline]
    pub fn params(&self) -> &PidParams {
        &self.params
    }

    #[inline]
    pub fn state(&self) -> &PidState {
        &self.state
    }

    /// Equivalent to re-creating the core with the same parameters.
    #[inline]
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.01;

    fn params(deadband: f64, integral_limit: f64) -> PidParams {
        PidParams {
            kp: 1.0,
            ki: 1.0,
            kd: 1.0,
            integral_limit,
            deadband,
        }
    }

    #[test]
    fn deadband_forces_zero() {
        let mut s = PidState::default();
        let step = pid_advance(&mut s, &params(0.5, 10.0), 0.3, DT);
        assert_eq!(step.error, 0.0);
        assert!(step.flags.contains(PidFlags::DEADBAND));
        assert_eq!(s.integral(), 0.0);
    }

    #[test]
    fn deadband_edge_passes_error() {
        // |error| == deadband is outside the band.
        let mut s = PidState::default();
        let step = pid_advance(&mut s, &params(0.5, 10.0), -0.5, DT);
        assert_eq!(step.error, -0.5);
        assert!(step.flags.is_empty());
    }

    #[test]
    fn integral_accumulates() {
        let mut s = PidState::default();
        let p = params(0.0, 100.0);
        for _ in 0..10 {
            pid_advance(&mut s, &p, 2.0, DT);
        }
        // 2.0 * 0.01 * 10 = 0.2
        assert!((s.integral() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn integral_clamped_both_ways() {
        let mut s = PidState::default();
        let p = params(0.0, 1.0);
        let mut last = None;
        for _ in 0..10_000 {
            let step = pid_advance(&mut s, &p, 50.0, DT);
            assert!(step.integral <= 1.0);
            last = Some(step);
        }
        let last = last.unwrap();
        assert_eq!(last.integral, 1.0);
        assert!(last.flags.contains(PidFlags::INTEGRAL_CLAMPED));

        for _ in 0..10_000 {
            let step = pid_advance(&mut s, &p, -50.0, DT);
            assert!(step.integral >= -1.0);
        }
        assert_eq!(s.integral(), -1.0);
    }

    #[test]
    fn derivative_uses_previous_error() {
        let mut s = PidState::default();
        let p = params(0.0, 10.0);
        let first = pid_advance(&mut s, &p, 1.0, DT);
        // prev_error starts at 0 → (1 - 0) / 0.01
        assert!((first.derivative - 100.0).abs() < 1e-9);
        let second = pid_advance(&mut s, &p, 1.0, DT);
        assert_eq!(second.derivative, 0.0);
    }

    #[test]
    fn zero_dt_gives_zero_derivative() {
        let mut s = PidState::default();
        let p = params(0.0, 10.0);
        let step = pid_advance(&mut s, &p, 5.0, 0.0);
        assert_eq!(step.derivative, 0.0);
        let step = pid_advance(&mut s, &p, 7.0, -0.01);
        assert_eq!(step.derivative, 0.0);
    }

    #[test]
    fn core_rejects_negative_limit() {
        assert!(PidCore::new(params(0.0, -1.0)).is_err());
        assert!(PidCore::new(params(-0.1, 1.0)).is_err());
    }

    #[test]
    fn core_reset_clears_state() {
        let mut core = PidCore::new(params(0.0, 10.0)).unwrap();
        for _ in 0..100 {
            core.advance(3.0, DT);
        }
        assert!(core.state().integral() > 0.0);
        core.reset();
        assert_eq!(core.state().integral(), 0.0);
        assert_eq!(core.state().prev_error(), 0.0);
    }
}
