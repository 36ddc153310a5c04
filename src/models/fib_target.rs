use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum LevelLabel {
    Support,
    Resistance,
}

/// A Fibonacci price level for the current wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FibTarget {
    pub price: f64,
    pub ratio: f64,
    pub label: LevelLabel,
    /// Measured against the immediately preceding closed wave.
    pub is_retracement: bool,
    /// Projected from an earlier wave of the same impulsive leg.
    pub is_extension: bool,
    /// Another ratio produced (almost) the same price and was folded into this level.
    pub confluence: bool,
}
