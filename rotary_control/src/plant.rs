//! Simulated plant: the rotary motor and the sensor observing it.
//!
//! [`Motor`] is the seam between the controllers and the physics. The
//! speed loop writes throttle through it; the encoder reads angle through
//! it.

pub mod encoder;
pub mod motor;
pub mod noise;

pub use encoder::Encoder;
pub use motor::RotaryMotor;
pub use noise::{GaussianNoise, NoNoise, NoiseSource};

/// Anything that accepts a throttle and reports its shaft angle.
pub trait Motor {
    /// Store a throttle command, clamped to `[0, 1]`.
    fn set_throttle(&mut self, throttle: f64);

    /// Currently applied throttle.
    fn throttle(&self) -> f64;

    /// Advance the physical state by `dt` seconds.
    fn update(&mut self, dt: f64);

    /// Wrapped shaft angle [deg], in `[0, 360)`.
    fn position_deg(&self) -> f64;

    /// Angular velocity [deg/s].
    fn velocity_deg_s(&self) -> f64;
}
