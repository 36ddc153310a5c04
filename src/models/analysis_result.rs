use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::domain::Wave;
use crate::models::FibTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

/// Non-fatal outcome flag. `NoConfirmedWave` is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStatus {
    Confirmed,
    NoConfirmedWave,
}

/// The terminal artifact of one analysis call. Plain immutable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub status: AnalysisStatus,

    /// Closed, valid waves of the live count, in chronological order.
    pub waves: Vec<Wave>,

    /// Every discarded wave, with its invalidation record. Audit only.
    pub invalid_waves: Vec<Wave>,

    /// The trailing open wave.
    pub current_wave: Wave,

    pub fib_targets: Vec<FibTarget>,
    pub trend: Trend,
    pub impulse_pattern: bool,
    pub corrective_pattern: bool,

    /// Close of the last bar analysed.
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub pivot_count: usize,
    /// Number of invalidate-and-restart events during sequencing.
    #[serde(default)]
    pub restarts: usize,
}

impl AnalysisResult {
    /// Completed labels as a compact string, e.g. `"1 2 3 4 5 A B C"`.
    pub fn label_sequence(&self) -> String {
        self.waves
            .iter()
            .map(|w| w.label.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
