//! Signal smoothing filters.
//!
//! Moving average (bounded history) and exponential (single state)
//! smoothing behind one [`SignalFilter`] capability. The speed loop uses
//! them on its raw velocity estimate.

use heapless::Deque;
use rotary_common::consts::MAX_FILTER_WINDOW;
use rotary_common::error::ParamError;
use rotary_common::params::FilterParams;

/// One-sample-in, one-sample-out smoother.
pub trait SignalFilter {
    /// Feed one sample and return the smoothed value.
    fn filter(&mut self, value: f64) -> f64;

    /// Forget all history.
    fn reset(&mut self);
}

// ─── Moving Average ─────────────────────────────────────────────────

/// Arithmetic mean of the most recent `window` samples.
///
/// Before the window fills, the mean of the samples seen so far.
/// History lives in a fixed-capacity ring; no allocation per sample.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    history: Deque<f64, MAX_FILTER_WINDOW>,
}

impl MovingAverage {
    /// # Errors
    /// [`ParamError::WindowSize`] unless `1 <= window <= MAX_FILTER_WINDOW`.
    pub fn new(window: usize) -> Result<Self, ParamError> {
        FilterParams::MovingAverage {
            window_size: window,
        }
        .validate()?;
        Ok(Self {
            window,
            history: Deque::new(),
        })
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of samples currently averaged.
    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl SignalFilter for MovingAverage {
    fn filter(&mut self, value: f64) -> f64 {
        if self.history.len() >= self.window {
            self.history.pop_front();
        }
        // window <= capacity, so there is always room here.
        let _ = self.history.push_back(value);

        let sum: f64 = self.history.iter().sum();
        sum / self.history.len() as f64
    }

    fn reset(&mut self) {
        self.history.clear();
    }
}

// ─── Exponential ────────────────────────────────────────────────────

/// First-order exponential smoothing.
///
/// ```text
/// y[0] = x[0]
/// y[n] = alpha·x[n] + (1 − alpha)·y[n-1]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Exponential {
    alpha: f64,
    last: Option<f64>,
}

impl Exponential {
    /// # Errors
    /// [`ParamError`] unless `0 < alpha <= 1`.
    pub fn new(alpha: f64) -> Result<Self, ParamError> {
        FilterParams::Exponential { alpha }.validate()?;
        Ok(Self { alpha, last: None })
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Last output, `None` before the first sample.
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

impl SignalFilter for Exponential {
    #[inline]
    fn filter(&mut self, value: f64) -> f64 {
        let out = match self.last {
            None => value,
            Some(prev) => self.alpha * value + (1.0 - self.alpha) * prev,
        };
        self.last = Some(out);
        out
    }

    #[inline]
    fn reset(&mut self) {
        self.last = None;
    }
}

// ─── Config-selected filter ─────────────────────────────────────────

/// Either smoother, chosen from [`FilterParams`]. Static dispatch.
#[derive(Debug, Clone)]
pub enum VelocityFilter {
    MovingAverage(MovingAverage),
    Exponential(Exponential),
}

impl VelocityFilter {
    /// # Errors
    /// [`ParamError`] if the window or alpha is outside its domain.
    pub fn from_params(params: &FilterParams) -> Result<Self, ParamError> {
        Ok(match *params {
            FilterParams::MovingAverage { window_size } => {
                Self::MovingAverage(MovingAverage::new(window_size)?)
            }
            FilterParams::Exponential { alpha } => Self::Exponential(Exponential::new(alpha)?),
        })
    }
}

impl SignalFilter for VelocityFilter {
    #[inline]
    fn filter(&mut self, value: f64) -> f64 {
        match self {
            Self::MovingAverage(f) => f.filter(value),
            Self::Exponential(f) => f.filter(value),
        }
    }

    #[inline]
    fn reset(&mut self) {
        match self {
            Self::MovingAverage(f) => f.reset(),
            Self::Exponential(f) => f.reset(),
        }
    }
}

impl From<MovingAverage> for VelocityFilter {
    fn from(f: MovingAverage) -> Self {
        Self::MovingAverage(f)
    }
}

impl From<Exponential> for VelocityFilter {
    fn from(f: Exponential) -> Self {
        Self::Exponential(f)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
