//! Closed-loop cascade driver.
//!
//! Owns every component of one run and advances them in a fixed order per
//! step:
//!
//! ```text
//! planner.get_ref(t) → position loop → speed loop (encoder) → motor.update(dt)
//! ```
//!
//! The position loop is fed the motor's multi-turn angle; the speed loop
//! measures through the encoder. Time is `steps · dt`, never a running sum.

use rotary_common::error::{ParamError, ensure_positive};
use rotary_common::params::StopParams;
use rotary_common::status::{MotorSnapshot, PositionStatus, SpeedStatus};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::control::{PositionControllerPid, SpeedControllerPid};
use crate::planner::{ProfilePoint, TrapezoidalPlanner};
use crate::plant::motor::RotaryMotor;
use crate::plant::noise::{GaussianNoise, NoiseSource};

/// Everything observable about one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Time at the start of the step [s].
    pub time: f64,
    pub reference: ProfilePoint,
    pub position: PositionStatus,
    pub speed: SpeedStatus,
    /// Motor state after the update.
    pub motor: MotorSnapshot,
}

/// Outcome of [`Simulation::run`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Total steps taken since construction or the last reset.
    pub steps: u64,
    /// Simulated time at the end of the run [s].
    pub elapsed: f64,
    /// Stopped on the settling condition rather than the time limit.
    pub settled: bool,
    /// Target minus final multi-turn position [deg].
    pub final_error_deg: f64,
}

/// One closed-loop actuator run.
#[derive(Debug, Clone)]
pub struct Simulation<N = GaussianNoise> {
    planner: TrapezoidalPlanner,
    motor: RotaryMotor,
    position: PositionControllerPid,
    speed: SpeedControllerPid<N>,
    dt: f64,
    stop: StopParams,
    steps: u64,
    time: f64,
    /// Consecutive in-tolerance steps after the profile ended.
    settle_count: u32,
}

impl<N: NoiseSource> Simulation<N> {
    /// Assemble a run from already-built components.
    ///
    /// The motor is used as-is; place it at the profile start first if the
    /// run should begin with zero error.
    ///
    /// # Errors
    /// [`ParamError`] if `dt` is not positive or the stop condition is
    /// invalid.
    pub fn new(
        planner: TrapezoidalPlanner,
        motor: RotaryMotor,
        position: PositionControllerPid,
        speed: SpeedControllerPid<N>,
        dt: f64,
        stop: StopParams,
    ) -> Result<Self, ParamError> {
        ensure_positive("dt", dt)?;
        stop.validate()?;
        debug!(
            "Simulation: dt={}s, max_time={}s, tol={} deg / {} deg/s over {} steps",
            dt,
            stop.max_time,
            stop.position_tolerance_deg,
            stop.velocity_tolerance_deg_s,
            stop.settle_steps
        );
        Ok(Self {
            planner,
            motor,
            position,
            speed,
            dt,
            stop,
            steps: 0,
            time: 0.0,
            settle_count: 0,
        })
    }

    /// Advance the whole cascade by one fixed step.
    pub fn step(&mut self) -> StepRecord {
        let t = self.time;
        let dt = self.dt;

        // ═══ REFERENCE ═══
        let reference = self.planner.get_ref(t);

        // ═══ CONTROL ═══
        let position = self.position.update(
            reference.position,
            self.motor.position_unwrapped_deg(),
            dt,
        );
        let speed = self.speed.update(&mut self.motor, position.vel_ref, dt);

        // ═══ PLANT ═══
        self.motor.update(dt);
        let motor = self.motor.snapshot();

        self.steps += 1;
        self.time = self.steps as f64 * dt;
        self.track_settling(t, &motor);

        trace!(
            "t={:.3}s ref={:.3} pos={:.3} vel={:.3} u={:.3} settle={}",
            t,
            reference.position,
            motor.position_unwrapped_deg,
            motor.velocity_deg_s,
            motor.throttle,
            self.settle_count
        );

        StepRecord {
            time: t,
            reference,
            position,
            speed,
            motor,
        }
    }

    fn track_settling(&mut self, t: f64, motor: &MotorSnapshot) {
        let error = self.planner.target() - motor.position_unwrapped_deg;
        let in_tolerance = self.planner.is_complete(t)
            && error.abs() <= self.stop.position_tolerance_deg
            && motor.velocity_deg_s.abs() <= self.stop.velocity_tolerance_deg_s;
        self.settle_count = if in_tolerance {
            self.settle_count.saturating_add(1)
        } else {
            0
        };
    }

    /// Step until settled or `max_time`, handing every record to
    /// `observer`.
    pub fn run<F: FnMut(&StepRecord)>(&mut self, mut observer: F) -> RunSummary {
        while self.time < self.stop.max_time {
            let record = self.step();
            observer(&record);
            if self.is_settled() {
                let summary = self.summary(true);
                info!(
                    "Settled after {} steps ({:.3}s), error {:.4} deg",
                    summary.steps, summary.elapsed, summary.final_error_deg
                );
                return summary;
            }
        }

        let summary = self.summary(false);
        warn!(
            "Not settled within {}s, error {:.4} deg",
            self.stop.max_time, summary.final_error_deg
        );
        summary
    }

    fn summary(&self, settled: bool) -> RunSummary {
        RunSummary {
            steps: self.steps,
            elapsed: self.time,
            settled,
            final_error_deg: self.planner.target() - self.motor.position_unwrapped_deg(),
        }
    }

    /// Settle counter reached `settle_steps` (at least one step).
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settle_count >= self.stop.settle_steps.max(1)
    }

    /// Back to t = 0 with the motor at rest at the profile start.
    pub fn reset(&mut self) {
        self.motor.reset(self.planner.start().to_radians());
        self.position.reset();
        self.speed.reset();
        self.steps = 0;
        self.time = 0.0;
        self.settle_count = 0;
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[inline]
    pub fn planner(&self) -> &TrapezoidalPlanner {
        &self.planner
    }

    #[inline]
    pub fn motor(&self) -> &RotaryMotor {
        &self.motor
    }

    /// Mutable motor access, e.g. to inject a disturbance mid-run.
    #[inline]
    pub fn motor_mut(&mut self) -> &mut RotaryMotor {
        &mut self.motor
    }

    #[inline]
    pub fn position_controller(&self) -> &PositionControllerPid {
        &self.position
    }

    #[inline]
    pub fn speed_controller(&self) -> &SpeedControllerPid<N> {
        &self.speed
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
