//! Noisy absolute-angle encoder.
//!
//! Each read returns the motor's wrapped angle plus one fresh noise
//! sample, wrapped back into `[0, 360)`. No filtering, no memory.

use rotary_common::consts::{FULL_TURN_DEG, wrap_angle};
use rotary_common::error::ParamError;
use rotary_common::params::EncoderParams;
use tracing::debug;

use super::Motor;
use super::noise::{GaussianNoise, NoiseSource};

/// Absolute encoder with injectable read noise.
///
/// The motor is passed per read, so the encoder only observes it.
#[derive(Debug, Clone)]
pub struct Encoder<N = GaussianNoise> {
    noise: N,
}

impl Encoder<GaussianNoise> {
    /// Gaussian encoder with a fixed seed.
    ///
    /// # Errors
    /// [`ParamError`] if the noise standard deviation is invalid.
    pub fn seeded(params: &EncoderParams, seed: u64) -> Result<Self, ParamError> {
        params.validate()?;
        debug!(
            "Encoder: noise_std={} deg, seed={}",
            params.noise_std_deg, seed
        );
        Ok(Self::with_noise(GaussianNoise::seeded(
            params.noise_std_deg,
            seed,
        )?))
    }

    /// Gaussian encoder seeded from OS entropy.
    ///
    /// # Errors
    /// [`ParamError`] if the noise standard deviation is invalid.
    pub fn from_entropy(params: &EncoderParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self::with_noise(GaussianNoise::from_entropy(
            params.noise_std_deg,
        )?))
    }
}

impl<N: NoiseSource> Encoder<N> {
    /// Encoder drawing its read noise from `noise`.
    pub fn with_noise(noise: N) -> Self {
        Self { noise }
    }

    /// Noisy wrapped angle [deg], in `[0, 360)`.
    pub fn read_position_deg<M: Motor + ?Sized>(&mut self, motor: &M) -> f64 {
        let noisy = motor.position_deg() + self.noise.sample();
        wrap_angle(noisy, FULL_TURN_DEG)
    }

    pub fn noise_mut(&mut self) -> &mut N {
        &mut self.noise
    }
}
