//! Parameter validation errors.
//!
//! Invalid construction parameters are the only hard failures in the
//! simulator. Runtime stepping clamps and guards instead of failing.

use thiserror::Error;

/// A construction parameter outside its valid domain.
///
/// Implements [`Copy`] for cheap propagation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParamError {
    /// Value was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    /// Value must be strictly greater than zero.
    #[error("{name} must be > 0, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    /// Value must be zero or greater.
    #[error("{name} must be >= 0, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// Value outside a closed interval.
    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Moving-average window outside `[1, max]`; `max` is the capacity of
    /// the fixed-size history buffer.
    #[error("window_size must lie in [1, {max}] (history buffer capacity), got {requested}")]
    WindowSize { requested: usize, max: usize },
}

/// Require a finite value.
#[inline]
pub fn ensure_finite(name: &'static str, value: f64) -> Result<f64, ParamError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParamError::NotFinite { name, value })
    }
}

/// Require a finite value strictly greater than zero.
#[inline]
pub fn ensure_positive(name: &'static str, value: f64) -> Result<f64, ParamError> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ParamError::NotPositive { name, value })
    }
}

/// Require a finite value greater than or equal to zero.
#[inline]
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64, ParamError> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ParamError::Negative { name, value })
    }
}

/// Require a finite value within `[min, max]`.
#[inline]
pub fn ensure_in_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ParamError> {
    ensure_finite(name, value)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ParamError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(ensure_positive("inertia", 0.01).is_ok());
        assert_eq!(
            ensure_positive("inertia", 0.0),
            Err(ParamError::NotPositive {
                name: "inertia",
                value: 0.0
            })
        );
        assert!(matches!(
            ensure_positive("inertia", f64::NAN),
            Err(ParamError::NotFinite { .. })
        ));
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(ensure_non_negative("deadband", 0.0), Ok(0.0));
        assert!(matches!(
            ensure_non_negative("deadband", -0.1),
            Err(ParamError::Negative { .. })
        ));
    }

    #[test]
    fn range_is_closed() {
        assert!(ensure_in_range("alpha", 0.0, 0.0, 1.0).is_ok());
        assert!(ensure_in_range("alpha", 1.0, 0.0, 1.0).is_ok());
        assert!(ensure_in_range("alpha", 1.0001, 0.0, 1.0).is_err());
    }

    #[test]
    fn messages_name_the_parameter() {
        let e = ParamError::WindowSize {
            requested: 0,
            max: 64,
        };
        assert_eq!(
            e.to_string(),
            "window_size must lie in [1, 64] (history buffer capacity), got 0"
        );
        let e = ParamError::NotPositive {
            name: "vmax",
            value: -1.0,
        };
        assert!(e.to_string().contains("vmax"));
    }
}
