//! Strongly-typed scalar values used across the wave engine.

use serde::{Deserialize, Serialize};

/// Minimum reversal (as a fraction of the candidate pivot price) needed to confirm a swing pivot.
/// e.g. 0.05 = price must reverse by 5% before the zigzag flips direction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PivotPct(f64);

impl PivotPct {
    pub const DEFAULT_VALUE: f64 = 0.05;
    pub const DEFAULT: Self = Self(Self::DEFAULT_VALUE);
    pub const MIN_VALUE: f64 = 0.0001;

    /// Clamps into `[MIN_VALUE, 1.0]`. Non-finite input falls back to the default.
    pub const fn new(val: f64) -> Self {
        let v = if val.is_nan() || val.is_infinite() {
            Self::DEFAULT_VALUE
        } else if val < Self::MIN_VALUE {
            Self::MIN_VALUE
        } else if val > 1.0 {
            1.0
        } else {
            val
        };
        Self(v)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Price a peak must fall to before it is confirmed.
    #[inline]
    pub fn reversal_down_from(self, peak: f64) -> f64 {
        peak * (1.0 - self.0)
    }

    /// Price a trough must rise to before it is confirmed.
    #[inline]
    pub fn reversal_up_from(self, trough: f64) -> f64 {
        trough * (1.0 + self.0)
    }
}

impl Default for PivotPct {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for PivotPct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_pct_clamps() {
        assert_eq!(PivotPct::new(-1.0).value(), PivotPct::MIN_VALUE);
        assert_eq!(PivotPct::new(3.0).value(), 1.0);
        assert_eq!(PivotPct::new(f64::NAN).value(), PivotPct::DEFAULT_VALUE);
        assert_eq!(PivotPct::new(0.1).value(), 0.1);
    }

    #[test]
    fn test_reversal_prices() {
        let pct = PivotPct::new(0.1);
        assert!((pct.reversal_down_from(200.0) - 180.0).abs() < 1e-9);
        assert!((pct.reversal_up_from(100.0) - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(PivotPct::new(0.05).to_string(), "5.00%");
    }
}
