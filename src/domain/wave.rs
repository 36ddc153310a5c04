use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::domain::{Pivot, PivotKind};

/// Ordinal wave label. Cycles `1 → 2 → 3 → 4 → 5 → A → B → C → 1 → …`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum WaveLabel {
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    One,
    #[serde(rename = "2")]
    #[strum(serialize = "2")]
    Two,
    #[serde(rename = "3")]
    #[strum(serialize = "3")]
    Three,
    #[serde(rename = "4")]
    #[strum(serialize = "4")]
    Four,
    #[serde(rename = "5")]
    #[strum(serialize = "5")]
    Five,
    A,
    B,
    C,
}

impl WaveLabel {
    pub const CYCLE_LEN: usize = 8;

    pub fn next(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::Three,
            Self::Three => Self::Four,
            Self::Four => Self::Five,
            Self::Five => Self::A,
            Self::A => Self::B,
            Self::B => Self::C,
            Self::C => Self::One,
        }
    }

    /// Position within the cycle, 0 for wave 1 through 7 for wave C.
    pub fn position(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
            Self::Four => 3,
            Self::Five => 4,
            Self::A => 5,
            Self::B => 6,
            Self::C => 7,
        }
    }

    pub fn role(self) -> WaveRole {
        match self {
            Self::One | Self::Three | Self::Five | Self::B => WaveRole::Impulsive,
            Self::Two | Self::Four | Self::A | Self::C => WaveRole::Corrective,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum WaveRole {
    Impulsive,
    Corrective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum WaveDirection {
    Up,
    Down,
}

impl WaveDirection {
    /// A wave leaving a trough goes up, a wave leaving a peak goes down.
    pub fn from_start(kind: PivotKind) -> Self {
        match kind {
            PivotKind::Trough => WaveDirection::Up,
            PivotKind::Peak => WaveDirection::Down,
        }
    }

    /// +1.0 for up, -1.0 for down. Multiply a price difference by this to orient it.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            WaveDirection::Up => 1.0,
            WaveDirection::Down => -1.0,
        }
    }
}

/// Why a wave was retroactively discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invalidation {
    pub rule: String,
    /// Timestamp of the pivot that broke the rule.
    pub timestamp: i64,
    /// Offending price at that pivot.
    pub price: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wave {
    pub label: WaveLabel,
    pub role: WaveRole,
    pub direction: WaveDirection,
    /// 0-based cycle number within the live count.
    pub cycle: usize,

    pub start_timestamp: i64,
    pub start_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_price: Option<f64>,

    pub is_complete: bool,
    pub is_valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalidation: Option<Invalidation>,
}

impl Wave {
    pub fn open(label: WaveLabel, cycle: usize, start: &Pivot) -> Self {
        Self {
            label,
            role: label.role(),
            direction: WaveDirection::from_start(start.kind),
            cycle,
            start_timestamp: start.timestamp_ms,
            start_price: start.price,
            end_timestamp: None,
            end_price: None,
            is_complete: false,
            is_valid: true,
            invalidation: None,
        }
    }

    pub fn close(&mut self, end: &Pivot) {
        self.end_timestamp = Some(end.timestamp_ms);
        self.end_price = Some(end.price);
        self.is_complete = true;
    }

    pub fn invalidate(&mut self, invalidation: Invalidation) {
        self.is_valid = false;
        self.invalidation = Some(invalidation);
    }

    /// Absolute price travel of a closed wave.
    pub fn extent(&self) -> Option<f64> {
        self.end_price.map(|end| (end - self.start_price).abs())
    }

    pub fn is_closed_and_valid(&self) -> bool {
        self.is_complete && self.is_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_label_cycle_wraps() {
        let labels: Vec<WaveLabel> = WaveLabel::iter().collect();
        assert_eq!(labels.len(), WaveLabel::CYCLE_LEN);
        for (i, label) in labels.iter().enumerate() {
            assert_eq!(label.position(), i);
            assert_eq!(label.next(), labels[(i + 1) % WaveLabel::CYCLE_LEN]);
        }
    }

    #[test]
    fn test_roles_follow_glossary() {
        let impulsive: Vec<String> = WaveLabel::iter()
            .filter(|l| l.role() == WaveRole::Impulsive)
            .map(|l| l.to_string())
            .collect();
        assert_eq!(impulsive, vec!["1", "3", "5", "B"]);
    }

    #[test]
    fn test_label_serializes_as_ordinal() {
        assert_eq!(serde_json::to_string(&WaveLabel::Three).unwrap(), "\"3\"");
        assert_eq!(serde_json::to_string(&WaveLabel::A).unwrap(), "\"A\"");
        let back: WaveLabel = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(back, WaveLabel::Five);
    }

    #[test]
    fn test_open_then_close() {
        let start = Pivot::new(0, 1_000, 100.0, PivotKind::Trough);
        let end = Pivot::new(5, 6_000, 150.0, PivotKind::Peak);
        let mut wave = Wave::open(WaveLabel::One, 0, &start);
        assert!(!wave.is_complete);
        assert_eq!(wave.extent(), None);
        assert_eq!(wave.direction, WaveDirection::Up);

        wave.close(&end);
        assert!(wave.is_complete);
        assert_eq!(wave.extent(), Some(50.0));
    }

    #[test]
    fn test_open_wave_omits_end_fields_in_json() {
        let start = Pivot::new(0, 1_000, 100.0, PivotKind::Peak);
        let wave = Wave::open(WaveLabel::Two, 0, &start);
        let json = serde_json::to_value(&wave).unwrap();
        assert!(json.get("endPrice").is_none());
        assert_eq!(json["isComplete"], false);
        assert_eq!(json["role"], "corrective");
    }
}
