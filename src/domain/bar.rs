use serde::{Deserialize, Serialize};

use crate::errors::WaveError;

/// One OHLC sample. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    // A constructor for convenience
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Bar {
            timestamp_ms,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Checks the canonical bar shape. `index` is only used for the error report.
    pub fn check(&self, index: usize) -> Result<(), WaveError> {
        let fail = |reason: String| Err(WaveError::InvalidBar { index, reason });

        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() {
                return fail(format!("{} price is not finite ({})", name, value));
            }
            if value <= 0.0 {
                return fail(format!("{} price is not positive ({})", name, value));
            }
        }

        if self.high < self.low {
            return fail(format!("high {} is below low {}", self.high, self.low));
        }

        if self.open > self.high || self.open < self.low || self.close > self.high || self.close < self.low {
            return fail(format!(
                "open/close ({}, {}) outside high/low range ({}, {})",
                self.open, self.close, self.low, self.high
            ));
        }

        if let Some(vol) = self.volume {
            if !vol.is_finite() || vol < 0.0 {
                return fail(format!("volume is not a finite non-negative number ({})", vol));
            }
        }

        Ok(())
    }
}

/// Validates a whole series: every bar well-formed and timestamps strictly increasing.
pub fn validate_bars(bars: &[Bar]) -> Result<(), WaveError> {
    for (i, bar) in bars.iter().enumerate() {
        bar.check(i)?;
        if i > 0 && bar.timestamp_ms <= bars[i - 1].timestamp_ms {
            return Err(WaveError::InvalidBar {
                index: i,
                reason: format!(
                    "timestamp {} is not after previous timestamp {}",
                    bar.timestamp_ms,
                    bars[i - 1].timestamp_ms
                ),
            });
        }
    }
    Ok(())
}
