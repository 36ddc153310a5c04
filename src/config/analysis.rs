//! Analysis configuration for the wave engine

use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::PivotPct;
use crate::config::constants::{MAX_BARS, MIN_BARS, fib};
use crate::errors::WaveError;

/// The Master Analysis Configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveConfig {
    /// Zigzag reversal threshold. The single most important tuning knob:
    /// too small gives micro-pivots that break counts, too large swallows real waves.
    pub pivot_threshold: PivotPct,

    /// Inputs shorter than this are rejected with `InsufficientData`.
    pub min_bars: usize,

    /// Keep only the most recent N bars (None = analyse everything supplied).
    pub max_bars: Option<usize>,

    pub retracement_ratios: Cow<'static, [f64]>,
    pub extension_ratios: Cow<'static, [f64]>,

    /// Relative price distance under which two fib levels collapse into one confluence level.
    pub confluence_tolerance_pct: f64,
}

pub const WAVE_ANALYSIS: WaveConfig = WaveConfig {
    pivot_threshold: PivotPct::DEFAULT,
    min_bars: MIN_BARS,
    max_bars: Some(MAX_BARS),
    retracement_ratios: Cow::Borrowed(fib::RETRACEMENT_RATIOS),
    extension_ratios: Cow::Borrowed(fib::EXTENSION_RATIOS),
    confluence_tolerance_pct: fib::CONFLUENCE_TOLERANCE_PCT,
};

impl Default for WaveConfig {
    fn default() -> Self {
        WAVE_ANALYSIS
    }
}

impl WaveConfig {
    pub fn with_threshold(mut self, pct: f64) -> Self {
        self.pivot_threshold = PivotPct::new(pct);
        self
    }

    pub fn with_min_bars(mut self, min_bars: usize) -> Self {
        self.min_bars = min_bars;
        self
    }

    pub fn with_max_bars(mut self, max_bars: Option<usize>) -> Self {
        self.max_bars = max_bars;
        self
    }

    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: WaveConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WaveError> {
        if self.min_bars < 2 {
            return Err(WaveError::InvalidConfig(format!(
                "min_bars must be at least 2 (got {})",
                self.min_bars
            )));
        }

        let threshold = self.pivot_threshold.value();
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(WaveError::InvalidConfig(format!(
                "pivot threshold must be in (0, 1] (got {})",
                threshold
            )));
        }

        if let Some(max) = self.max_bars {
            if max < self.min_bars {
                return Err(WaveError::InvalidConfig(format!(
                    "max_bars ({}) is below min_bars ({})",
                    max, self.min_bars
                )));
            }
        }

        let bad_ratio = self
            .retracement_ratios
            .iter()
            .chain(self.extension_ratios.iter())
            .find(|r| !r.is_finite() || **r <= 0.0);
        if let Some(r) = bad_ratio {
            return Err(WaveError::InvalidConfig(format!(
                "fibonacci ratios must be finite and positive (got {})",
                r
            )));
        }

        if !self.confluence_tolerance_pct.is_finite() || self.confluence_tolerance_pct < 0.0 {
            return Err(WaveError::InvalidConfig(format!(
                "confluence tolerance must be finite and non-negative (got {})",
                self.confluence_tolerance_pct
            )));
        }

        Ok(())
    }
}
