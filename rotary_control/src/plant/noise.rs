//! Injectable noise sources for sensor simulation.
//!
//! The encoder draws one sample per read through [`NoiseSource`], so tests
//! can swap the random stream for a seeded one, a scripted closure, or
//! [`NoNoise`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rotary_common::error::{ParamError, ensure_non_negative};

/// A stream of additive, zero-mean noise samples.
pub trait NoiseSource {
    /// Draw the next sample.
    fn sample(&mut self) -> f64;
}

/// Noise-free source; every sample is `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    #[inline]
    fn sample(&mut self) -> f64 {
        0.0
    }
}

/// Any `FnMut() -> f64` is a noise source.
impl<F: FnMut() -> f64> NoiseSource for F {
    #[inline]
    fn sample(&mut self) -> f64 {
        self()
    }
}

/// Independent Gaussian samples `N(0, std²)`.
///
/// A zero standard deviation yields exact zeros without touching the RNG.
#[derive(Debug, Clone)]
pub struct GaussianNoise<R = ChaCha8Rng> {
    dist: Option<Normal<f64>>,
    std_dev: f64,
    rng: R,
}

impl GaussianNoise<ChaCha8Rng> {
    /// Deterministic stream: same seed, same samples.
    ///
    /// # Errors
    /// [`ParamError`] if `std_dev` is negative or non-finite.
    pub fn seeded(std_dev: f64, seed: u64) -> Result<Self, ParamError> {
        Self::with_rng(std_dev, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Stream seeded from OS entropy; runs are not reproducible.
    ///
    /// # Errors
    /// [`ParamError`] if `std_dev` is negative or non-finite.
    pub fn from_entropy(std_dev: f64) -> Result<Self, ParamError> {
        Self::with_rng(std_dev, ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> GaussianNoise<R> {
    /// Gaussian noise drawn from a caller-supplied generator.
    ///
    /// # Errors
    /// [`ParamError`] if `std_dev` is negative or non-finite.
    pub fn with_rng(std_dev: f64, rng: R) -> Result<Self, ParamError> {
        ensure_non_negative("noise_std_deg", std_dev)?;
        let dist = if std_dev > 0.0 {
            Some(
                Normal::new(0.0, std_dev).map_err(|_| ParamError::Negative {
                    name: "noise_std_deg",
                    value: std_dev,
                })?,
            )
        } else {
            None
        };
        Ok(Self { dist, std_dev, rng })
    }

    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl<R: Rng> NoiseSource for GaussianNoise<R> {
    #[inline]
    fn sample(&mut self) -> f64 {
        match &self.dist {
            Some(dist) => dist.sample(&mut self.rng),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_is_deterministic() {
        let mut a = GaussianNoise::seeded(0.5, 42).unwrap();
        let mut b = GaussianNoise::seeded(0.5, 42).unwrap();
        for _ in 0..100 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = GaussianNoise::seeded(0.5, 1).unwrap();
        let mut b = GaussianNoise::seeded(0.5, 2).unwrap();
        let va: Vec<f64> = (0..5).map(|_| a.sample()).collect();
        let vb: Vec<f64> = (0..5).map(|_| b.sample()).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn zero_std_is_exactly_zero() {
        let mut n = GaussianNoise::seeded(0.0, 7).unwrap();
        for _ in 0..10 {
            assert_eq!(n.sample(), 0.0);
        }
    }

    #[test]
    fn rejects_negative_std() {
        assert!(GaussianNoise::seeded(-0.1, 0).is_err());
        assert!(GaussianNoise::seeded(f64::INFINITY, 0).is_err());
    }

    #[test]
    fn sample_statistics_match() {
        let mut n = GaussianNoise::seeded(2.0, 1234).unwrap();
        let count = 20_000;
        let samples: Vec<f64> = (0..count).map(|_| n.sample()).collect();
        let mean = samples.iter().sum::<f64>() / count as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / count as f64;
        assert!(mean.abs() < 0.1, "mean = {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std = {}", var.sqrt());
    }

    #[test]
    fn closures_are_noise_sources() {
        let mut k = 0.0;
        let mut ramp = move || {
            k += 1.0;
            k
        };
        assert_eq!(NoiseSource::sample(&mut ramp), 1.0);
        assert_eq!(NoiseSource::sample(&mut ramp), 2.0);
        assert_eq!(NoNoise.sample(), 0.0);
    }
}
