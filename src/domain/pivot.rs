use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum PivotKind {
    Peak,
    Trough,
}

impl PivotKind {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            PivotKind::Peak => PivotKind::Trough,
            PivotKind::Trough => PivotKind::Peak,
        }
    }

    /// True when `candidate` is a more extreme price than `current` for this kind.
    /// Equal prices are not more extreme (the earlier pivot is kept).
    #[inline]
    pub fn is_more_extreme(self, candidate: f64, current: f64) -> bool {
        match self {
            PivotKind::Peak => candidate > current,
            PivotKind::Trough => candidate < current,
        }
    }
}

/// A swing extremum. Price is the bar high for a peak, the bar low for a trough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pivot {
    /// Index of the source bar.
    pub bar_index: usize,
    pub timestamp_ms: i64,
    pub price: f64,
    pub kind: PivotKind,
}

impl Pivot {
    pub fn new(bar_index: usize, timestamp_ms: i64, price: f64, kind: PivotKind) -> Self {
        Self {
            bar_index,
            timestamp_ms,
            price,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_more_extreme() {
        assert!(PivotKind::Peak.is_more_extreme(11.0, 10.0));
        assert!(!PivotKind::Peak.is_more_extreme(10.0, 10.0));
        assert!(PivotKind::Trough.is_more_extreme(9.0, 10.0));
        assert!(!PivotKind::Trough.is_more_extreme(10.0, 10.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(PivotKind::Peak.to_string(), "peak");
        assert_eq!(PivotKind::Trough.opposite(), PivotKind::Peak);
    }
}
