//! Construction-time parameters for every simulator component.
//!
//! Each struct deserializes from TOML and carries a `validate()` that
//! reports the first parameter outside its domain. Constructors in
//! `rotary_control` call `validate()` and fail fast.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DT, MAX_FILTER_WINDOW};
use crate::error::{
    ParamError, ensure_finite, ensure_in_range, ensure_non_negative, ensure_positive,
};

// ─── Motor ──────────────────────────────────────────────────────────

/// Physical parameters of the rotary plant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotorParams {
    /// Rotor inertia [kg·m²].
    pub inertia: f64,
    /// Viscous friction coefficient [Nm/(rad/s)].
    pub friction_viscous: f64,
    /// Coulomb friction magnitude [Nm].
    #[serde(default)]
    pub friction_coulomb: f64,
    /// Torque at full throttle [Nm].
    pub max_torque: f64,
    /// Constant external disturbance torque [Nm].
    #[serde(default)]
    pub external_torque: f64,
}

impl MotorParams {
    /// Motor without Coulomb friction or disturbance.
    pub const fn new(inertia: f64, friction_viscous: f64, max_torque: f64) -> Self {
        Self {
            inertia,
            friction_viscous,
            friction_coulomb: 0.0,
            max_torque,
            external_torque: 0.0,
        }
    }

    /// Set the Coulomb friction magnitude [Nm].
    pub const fn with_coulomb(mut self, friction_coulomb: f64) -> Self {
        self.friction_coulomb = friction_coulomb;
        self
    }

    /// Set the external disturbance torque [Nm].
    pub const fn with_external_torque(mut self, external_torque: f64) -> Self {
        self.external_torque = external_torque;
        self
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        ensure_positive("inertia", self.inertia)?;
        ensure_non_negative("friction_viscous", self.friction_viscous)?;
        ensure_non_negative("friction_coulomb", self.friction_coulomb)?;
        ensure_non_negative("max_torque", self.max_torque)?;
        ensure_finite("external_torque", self.external_torque)?;
        Ok(())
    }
}

// ─── Encoder ────────────────────────────────────────────────────────

/// Absolute angle sensor noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncoderParams {
    /// Standard deviation of the Gaussian read noise [deg].
    #[serde(default = "default_noise_std_deg")]
    pub noise_std_deg: f64,
}

fn default_noise_std_deg() -> f64 {
    0.1
}

impl Default for EncoderParams {
    fn default() -> Self {
        Self {
            noise_std_deg: default_noise_std_deg(),
        }
    }
}

impl EncoderParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ensure_non_negative("noise_std_deg", self.noise_std_deg)?;
        Ok(())
    }
}

// ─── Filters ────────────────────────────────────────────────────────

/// Velocity smoothing strategy.
///
/// Fields belonging to the other kind are rejected. `window_size` is
/// capped at [`MAX_FILTER_WINDOW`]: the moving average keeps its history
/// in a fixed-capacity buffer, so the cap is a storage limit of this
/// filter rather than of the smoothing model.
///
/// # TOML Example
///
/// ```toml
/// [velocity_filter]
/// kind = "moving_average"
/// window_size = 5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum FilterParams {
    /// Arithmetic mean of the last `window_size` samples.
    MovingAverage { window_size: usize },
    /// `y = alpha·x + (1 − alpha)·y_prev`, seeded with the first input.
    Exponential { alpha: f64 },
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::MovingAverage { window_size: 5 }
    }
}

impl FilterParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        match *self {
            Self::MovingAverage { window_size } => {
                if window_size == 0 || window_size > MAX_FILTER_WINDOW {
                    return Err(ParamError::WindowSize {
                        requested: window_size,
                        max: MAX_FILTER_WINDOW,
                    });
                }
            }
            Self::Exponential { alpha } => {
                ensure_in_range("alpha", alpha, 0.0, 1.0)?;
                if alpha == 0.0 {
                    return Err(ParamError::NotPositive {
                        name: "alpha",
                        value: alpha,
                    });
                }
            }
        }
        Ok(())
    }
}

// ─── Planner ────────────────────────────────────────────────────────

/// Trapezoidal move between two angles [deg].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerParams {
    /// Start position [deg].
    pub pos0: f64,
    /// End position [deg].
    pub posf: f64,
    /// Cruise velocity limit [deg/s].
    pub vmax: f64,
    /// Acceleration limit [deg/s²].
    pub amax: f64,
}

impl PlannerParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ensure_finite("pos0", self.pos0)?;
        ensure_finite("posf", self.posf)?;
        ensure_positive("vmax", self.vmax)?;
        ensure_positive("amax", self.amax)?;
        Ok(())
    }
}

// ─── PID ────────────────────────────────────────────────────────────

/// Gains and limits shared by both control loops.
///
/// Defaults are the outer (position) loop tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidParams {
    /// Proportional gain.
    #[serde(default = "default_position_kp")]
    pub kp: f64,
    /// Integral gain (0 = disabled).
    #[serde(default)]
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    #[serde(default)]
    pub kd: f64,
    /// Integral accumulator bound, applied symmetrically.
    #[serde(default = "default_integral_limit")]
    pub integral_limit: f64,
    /// Errors smaller in magnitude than this are treated as zero.
    #[serde(default)]
    pub deadband: f64,
}

fn default_position_kp() -> f64 {
    2.0
}

fn default_integral_limit() -> f64 {
    50.0
}

impl Default for PidParams {
    fn default() -> Self {
        Self {
            kp: default_position_kp(),
            ki: 0.0,
            kd: 0.0,
            integral_limit: default_integral_limit(),
            deadband: 0.0,
        }
    }
}

impl PidParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ensure_finite("kp", self.kp)?;
        ensure_finite("ki", self.ki)?;
        ensure_finite("kd", self.kd)?;
        ensure_non_negative("integral_limit", self.integral_limit)?;
        ensure_non_negative("deadband", self.deadband)?;
        Ok(())
    }
}

/// Inner (velocity) loop tuning: PID gains plus derivative smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeedPidParams {
    #[serde(default = "default_speed_kp")]
    pub kp: f64,
    #[serde(default = "default_speed_ki")]
    pub ki: f64,
    #[serde(default = "default_speed_kd")]
    pub kd: f64,
    #[serde(default = "default_integral_limit")]
    pub integral_limit: f64,
    /// Velocity deadband [deg/s].
    #[serde(default = "default_speed_deadband")]
    pub deadband: f64,
    /// Weight of the newest raw derivative in the smoothed derivative.
    #[serde(default = "default_derivative_alpha")]
    pub derivative_alpha: f64,
}

fn default_speed_kp() -> f64 {
    0.2
}

fn default_speed_ki() -> f64 {
    0.03
}

fn default_speed_kd() -> f64 {
    0.02
}

fn default_speed_deadband() -> f64 {
    1.0
}

fn default_derivative_alpha() -> f64 {
    0.2
}

impl Default for SpeedPidParams {
    fn default() -> Self {
        Self {
            kp: default_speed_kp(),
            ki: default_speed_ki(),
            kd: default_speed_kd(),
            integral_limit: default_integral_limit(),
            deadband: default_speed_deadband(),
            derivative_alpha: default_derivative_alpha(),
        }
    }
}

impl SpeedPidParams {
    /// The gain/limit/deadband subset shared with the position loop.
    pub const fn pid(&self) -> PidParams {
        PidParams {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            integral_limit: self.integral_limit,
            deadband: self.deadband,
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        self.pid().validate()?;
        ensure_in_range("derivative_alpha", self.derivative_alpha, 0.0, 1.0)?;
        Ok(())
    }
}

// ─── Run control ────────────────────────────────────────────────────

/// When the cascade driver stops stepping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopParams {
    /// Hard time limit [s].
    #[serde(default = "default_max_time")]
    pub max_time: f64,
    /// Settled when |position error| stays within this [deg].
    #[serde(default = "default_position_tolerance")]
    pub position_tolerance_deg: f64,
    /// Settled when |velocity| stays within this [deg/s].
    #[serde(default = "default_velocity_tolerance")]
    pub velocity_tolerance_deg_s: f64,
    /// Consecutive in-tolerance steps required after the profile ends.
    #[serde(default = "default_settle_steps")]
    pub settle_steps: u32,
}

fn default_max_time() -> f64 {
    30.0
}

fn default_position_tolerance() -> f64 {
    0.5
}

fn default_velocity_tolerance() -> f64 {
    1.0
}

fn default_settle_steps() -> u32 {
    50
}

impl Default for StopParams {
    fn default() -> Self {
        Self {
            max_time: default_max_time(),
            position_tolerance_deg: default_position_tolerance(),
            velocity_tolerance_deg_s: default_velocity_tolerance(),
            settle_steps: default_settle_steps(),
        }
    }
}

impl StopParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ensure_positive("max_time", self.max_time)?;
        ensure_non_negative("position_tolerance_deg", self.position_tolerance_deg)?;
        ensure_non_negative("velocity_tolerance_deg_s", self.velocity_tolerance_deg_s)?;
        Ok(())
    }
}

// ─── Complete simulation ────────────────────────────────────────────

/// Everything needed to assemble one closed-loop run.
///
/// # TOML Example
///
/// ```toml
/// dt = 0.01
///
/// [motor]
/// inertia = 0.01
/// friction_viscous = 0.001
/// max_torque = 1.0
///
/// [planner]
/// pos0 = 0.0
/// posf = 90.0
/// vmax = 60.0
/// amax = 120.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Fixed step [s].
    #[serde(default = "default_dt")]
    pub dt: f64,
    pub motor: MotorParams,
    #[serde(default)]
    pub encoder: EncoderParams,
    /// Velocity estimate smoothing (`None` = raw differences).
    #[serde(default)]
    pub velocity_filter: Option<FilterParams>,
    pub planner: PlannerParams,
    #[serde(default)]
    pub position_pid: PidParams,
    #[serde(default)]
    pub speed_pid: SpeedPidParams,
    #[serde(default)]
    pub stop: StopParams,
}

fn default_dt() -> f64 {
    DEFAULT_DT
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ParamError> {
        ensure_positive("dt", self.dt)?;
        self.motor.validate()?;
        self.encoder.validate()?;
        if let Some(filter) = &self.velocity_filter {
            filter.validate()?;
        }
        self.planner.validate()?;
        self.position_pid.validate()?;
        self.speed_pid.validate()?;
        self.stop.validate()?;
        Ok(())
    }
}
