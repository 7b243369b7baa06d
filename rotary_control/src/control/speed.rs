//! Inner loop: velocity error → throttle.
//!
//! Velocity is estimated by differencing successive encoder reads the
//! short way round the circle, optionally smoothed. The derivative term is
//! low-passed with its own `derivative_alpha`. The clamped output is
//! written straight into the motor.

use rotary_common::consts::{FULL_TURN_DEG, HALF_TURN_DEG};
use rotary_common::error::ParamError;
use rotary_common::params::SpeedPidParams;
use rotary_common::status::{PidFlags, SpeedStatus};
use tracing::{debug, trace};

use super::filters::{SignalFilter, VelocityFilter};
use super::pid::PidCore;
use crate::plant::Motor;
use crate::plant::encoder::Encoder;
use crate::plant::noise::{GaussianNoise, NoiseSource};

/// Signed angle travelled from `prev_deg` to `current_deg` along the
/// shorter arc [deg].
///
/// `shortest_angle_delta(350.0, 10.0) == 20.0`.
#[inline]
pub fn shortest_angle_delta(prev_deg: f64, current_deg: f64) -> f64 {
    let delta = current_deg - prev_deg;
    if delta > HALF_TURN_DEG {
        delta - FULL_TURN_DEG
    } else if delta < -HALF_TURN_DEG {
        delta + FULL_TURN_DEG
    } else {
        delta
    }
}

/// Velocity PID that owns the encoder and drives the motor throttle.
#[derive(Debug, Clone)]
pub struct SpeedControllerPid<N = GaussianNoise> {
    core: PidCore,
    derivative_alpha: f64,
    encoder: Encoder<N>,
    velocity_filter: Option<VelocityFilter>,
    /// Smoothed derivative, starts at zero.
    derivative_filtered: f64,
    /// Previous encoder sample [deg]; `None` until the first read.
    prev_sample: Option<f64>,
    /// Last returned estimate [deg/s].
    last_estimate: f64,
}

impl<N: NoiseSource> SpeedControllerPid<N> {
    /// # Errors
    /// [`ParamError`] on invalid gains, limit, deadband or
    /// `derivative_alpha` outside `[0, 1]`.
    pub fn new(
        params: SpeedPidParams,
        encoder: Encoder<N>,
        velocity_filter: Option<VelocityFilter>,
    ) -> Result<Self, ParamError> {
        params.validate()?;
        debug!(
            "SpeedControllerPid: kp={} ki={} kd={} limit={} deadband={} d_alpha={} filter={:?}",
            params.kp,
            params.ki,
            params.kd,
            params.integral_limit,
            params.deadband,
            params.derivative_alpha,
            velocity_filter
        );
        Ok(Self {
            core: PidCore::new(params.pid())?,
            derivative_alpha: params.derivative_alpha,
            encoder,
            velocity_filter,
            derivative_filtered: 0.0,
            prev_sample: None,
            last_estimate: 0.0,
        })
    }

    /// Estimate shaft velocity [deg/s] from a fresh encoder read.
    ///
    /// The first call only records the reference sample and returns 0.
    /// A non-positive `dt` records the sample and repeats the previous
    /// estimate without feeding the filter.
    pub fn estimate_velocity_deg_s<M: Motor + ?Sized>(&mut self, motor: &M, dt: f64) -> f64 {
        let sample = self.encoder.read_position_deg(motor);
        let Some(prev) = self.prev_sample.replace(sample) else {
            return 0.0;
        };
        if !dt.is_finite() || dt <= 0.0 {
            return self.last_estimate;
        }

        let raw = shortest_angle_delta(prev, sample) / dt;
        let estimate = match self.velocity_filter.as_mut() {
            Some(filter) => filter.filter(raw),
            None => raw,
        };
        self.last_estimate = estimate;
        estimate
    }

    /// Run one control cycle and write the throttle into `motor`.
    ///
    /// # Arguments
    /// - `motor`: Plant read through the encoder and driven by the output.
    /// - `desired_velocity`: Setpoint [deg/s].
    /// - `dt`: Cycle period [s].
    pub fn update<M: Motor + ?Sized>(
        &mut self,
        motor: &mut M,
        desired_velocity: f64,
        dt: f64,
    ) -> SpeedStatus {
        let measured_velocity = self.estimate_velocity_deg_s(&*motor, dt);
        let step = self.core.advance(desired_velocity - measured_velocity, dt);
        let mut flags = step.flags;

        let a = self.derivative_alpha;
        self.derivative_filtered = (1.0 - a) * self.derivative_filtered + a * step.derivative;

        let params = self.core.params();
        let p_term = params.kp * step.error;
        let i_term = params.ki * step.integral;
        let d_term = params.kd * self.derivative_filtered;
        let output = p_term + i_term + d_term;

        let throttle = if output.is_nan() {
            0.0
        } else {
            output.clamp(0.0, 1.0)
        };
        if throttle != output {
            flags |= PidFlags::OUTPUT_SATURATED;
        }
        motor.set_throttle(throttle);

        trace!(
            "Speed loop: meas={:.3}, err={:.3}, P={:.4}, I={:.4}, D={:.4}, u={:.3}",
            measured_velocity, step.error, p_term, i_term, d_term, throttle
        );

        SpeedStatus {
            measured_velocity,
            error: step.error,
            p_term,
            i_term,
            d_term,
            throttle,
            flags,
        }
    }

    /// Current integral accumulator.
    #[inline]
    pub fn integral(&self) -> f64 {
        self.core.state().integral()
    }

    /// Current smoothed derivative (unweighted).
    #[inline]
    pub fn derivative_filtered(&self) -> f64 {
        self.derivative_filtered
    }

    #[inline]
    pub fn encoder_mut(&mut self) -> &mut Encoder<N> {
        &mut self.encoder
    }

    #[inline]
    pub fn velocity_filter(&self) -> Option<&VelocityFilter> {
        self.velocity_filter.as_ref()
    }

    /// Equivalent to re-creating the controller with the same parts.
    pub fn reset(&mut self) {
        self.core.reset();
        self.derivative_filtered = 0.0;
        self.prev_sample = None;
        self.last_estimate = 0.0;
        if let Some(filter) = self.velocity_filter.as_mut() {
            filter.reset();
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
