// Top Level Constants

/// Minimum number of bars the caller must supply before analysis is attempted.
pub const MIN_BARS: usize = 50;

/// Default cap on history. The surrounding system feeds 180-365 of the most recent bars.
pub const MAX_BARS: usize = 365;

pub mod fib {
    /// Retracement ratios, measured against the immediately preceding closed wave.
    pub const RETRACEMENT_RATIOS: &[f64] = &[0.382, 0.5, 0.618, 1.0];

    /// Extension ratios, projected from an impulsive wave's start using the prior same-direction impulse's extent.
    pub const EXTENSION_RATIOS: &[f64] = &[1.618, 2.618, 4.236];

    /// Two levels within this fraction of price are merged into one confluence level.
    pub const CONFLUENCE_TOLERANCE_PCT: f64 = 0.001;
}

pub mod rules {
    pub const WAVE3_CONFIRMATION: &str = "wave3-confirmation";
    pub const WAVE2_RETRACEMENT: &str = "wave2-retracement";
    pub const WAVE4_OVERLAP: &str = "wave4-overlap";
    pub const WAVE3_LONGEST: &str = "wave3-longest";
    pub const WAVE1_WAVE4_RANGE_OVERLAP: &str = "wave1-wave4-range-overlap";
}
