use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal outcomes of a single analysis call.
///
/// A count that never reaches a confirmed wave 3 is not an error; it is reported through
/// `AnalysisStatus::NoConfirmedWave` on an otherwise normal result. Rule violations during
/// counting are not errors either: they land in `AnalysisResult::invalid_waves`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum WaveError {
    /// Input empty or shorter than the configured minimum.
    #[error("Insufficient data: {found} bar(s) supplied (minimum: {required})")]
    InsufficientData { found: usize, required: usize },

    /// Non-finite / non-positive price, inconsistent high/low, or non-monotonic timestamp.
    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    /// The zigzag pass found fewer than two pivots.
    #[error("Degenerate pivot sequence: {pivots} pivot(s) found at {threshold_pct:.2}% threshold")]
    DegeneratePivotSequence { pivots: usize, threshold_pct: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
