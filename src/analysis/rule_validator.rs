//! Elliott Wave invalidation rules.
//!
//! Every rule is a pure function of the closed wave prices of the current cycle. Rules run in a
//! fixed order and evaluation stops at the first failure (or at the wave-3 gate while wave 3 is
//! still open).

use crate::config::constants::rules;
use crate::domain::{Invalidation, Wave, WaveLabel};

/// Read-only view of the cycle being validated.
pub struct CycleView<'a> {
    waves: &'a [Wave],
}

impl<'a> CycleView<'a> {
    /// `waves[0]` must be the cycle's wave 1.
    pub fn new(waves: &'a [Wave]) -> Self {
        Self { waves }
    }

    #[inline]
    pub fn wave(&self, label: WaveLabel) -> Option<&'a Wave> {
        self.waves
            .get(label.position())
            .filter(|w| w.label == label)
    }

    /// The wave if it exists and has an end pivot.
    #[inline]
    pub fn closed(&self, label: WaveLabel) -> Option<&'a Wave> {
        self.wave(label).filter(|w| w.is_complete)
    }

    /// Orientation of the cycle: +1.0 when wave 1 goes up.
    #[inline]
    pub fn sign(&self) -> f64 {
        self.waves.first().map(|w| w.direction.sign()).unwrap_or(1.0)
    }

    /// True when `price` lies strictly beyond `reference` against the cycle direction.
    #[inline]
    fn is_adverse(&self, price: f64, reference: f64) -> bool {
        (price - reference) * self.sign() < 0.0
    }
}

/// A broken rule, with the offending prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub rule: &'static str,
    pub timestamp: i64,
    pub price: f64,
    pub reason: String,
}

impl Violation {
    pub fn to_invalidation(&self) -> Invalidation {
        Invalidation {
            rule: self.rule.to_string(),
            timestamp: self.timestamp,
            price: self.price,
            reason: self.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Pass,
    /// Not enough closed waves yet.
    NotApplicable,
    /// Cannot be decided until an open wave closes. Stops evaluation without failing.
    Pending,
    Fail(Violation),
}

pub trait WaveRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, cycle: &CycleView) -> RuleOutcome;
}

/// Result of validating one candidate count.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// All applicable rules hold and wave 3 is confirmed.
    Valid,
    /// Nothing broken, but wave 3 is not confirmed yet.
    Provisional,
    Invalid(Violation),
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Rule 1: wave 3 must end beyond wave 1's end before anything past wave 2 counts as confirmed.
pub struct Wave3Confirmation;

impl WaveRule for Wave3Confirmation {
    fn name(&self) -> &'static str {
        rules::WAVE3_CONFIRMATION
    }

    fn check(&self, cycle: &CycleView) -> RuleOutcome {
        let Some(w3) = cycle.wave(WaveLabel::Three) else {
            return RuleOutcome::NotApplicable;
        };
        let (Some(w1_end), Some(w3_end)) = (
            cycle.closed(WaveLabel::One).and_then(|w| w.end_price),
            w3.end_price,
        ) else {
            return RuleOutcome::Pending;
        };

        // A closed wave 3 can never satisfy the gate later on
        if (w3_end - w1_end) * cycle.sign() <= 0.0 {
            return RuleOutcome::Fail(Violation {
                rule: self.name(),
                timestamp: w3.end_timestamp.unwrap_or(w3.start_timestamp),
                price: w3_end,
                reason: format!(
                    "wave 3 ended at {:.4}, not beyond wave 1 end {:.4}",
                    w3_end, w1_end
                ),
            });
        }
        RuleOutcome::Pass
    }
}

/// Rule 2: wave 2 cannot retrace more than 100% of wave 1.
pub struct Wave2Retracement;

impl WaveRule for Wave2Retracement {
    fn name(&self) -> &'static str {
        rules::WAVE2_RETRACEMENT
    }

    fn check(&self, cycle: &CycleView) -> RuleOutcome {
        let (Some(w1), Some(w2)) = (cycle.wave(WaveLabel::One), cycle.closed(WaveLabel::Two)) else {
            return RuleOutcome::NotApplicable;
        };
        let Some(w2_end) = w2.end_price else {
            return RuleOutcome::NotApplicable;
        };

        if cycle.is_adverse(w2_end, w1.start_price) {
            return RuleOutcome::Fail(Violation {
                rule: self.name(),
                timestamp: w2.end_timestamp.unwrap_or(w2.start_timestamp),
                price: w2_end,
                reason: format!(
                    "wave 2 ended at {:.4}, beyond wave 1 start {:.4} (more than 100% retracement)",
                    w2_end, w1.start_price
                ),
            });
        }
        RuleOutcome::Pass
    }
}

/// Rule 3: wave 4 must not end inside wave 1's territory.
pub struct Wave4Overlap;

impl WaveRule for Wave4Overlap {
    fn name(&self) -> &'static str {
        rules::WAVE4_OVERLAP
    }

    fn check(&self, cycle: &CycleView) -> RuleOutcome {
        let (Some(w1_end), Some(w4)) = (
            cycle.closed(WaveLabel::One).and_then(|w| w.end_price),
            cycle.closed(WaveLabel::Four),
        ) else {
            return RuleOutcome::NotApplicable;
        };
        let Some(w4_end) = w4.end_price else {
            return RuleOutcome::NotApplicable;
        };

        if cycle.is_adverse(w4_end, w1_end) {
            return RuleOutcome::Fail(Violation {
                rule: self.name(),
                timestamp: w4.end_timestamp.unwrap_or(w4.start_timestamp),
                price: w4_end,
                reason: format!(
                    "wave 4 ended at {:.4}, inside wave 1 territory (wave 1 end {:.4})",
                    w4_end, w1_end
                ),
            });
        }
        RuleOutcome::Pass
    }
}

/// Rule 4: with waves 1, 3 and 5 closed, wave 3 must have the largest extent.
pub struct Wave3Longest;

impl WaveRule for Wave3Longest {
    fn name(&self) -> &'static str {
        rules::WAVE3_LONGEST
    }

    fn check(&self, cycle: &CycleView) -> RuleOutcome {
        let (Some(w1), Some(w3), Some(w5)) = (
            cycle.closed(WaveLabel::One),
            cycle.closed(WaveLabel::Three),
            cycle.closed(WaveLabel::Five),
        ) else {
            return RuleOutcome::NotApplicable;
        };
        let (Some(e1), Some(e3), Some(e5)) = (w1.extent(), w3.extent(), w5.extent()) else {
            return RuleOutcome::NotApplicable;
        };

        if e3 < e1 || e3 < e5 {
            return RuleOutcome::Fail(Violation {
                rule: self.name(),
                timestamp: w5.end_timestamp.unwrap_or(w5.start_timestamp),
                price: w5.end_price.unwrap_or(w5.start_price),
                reason: format!(
                    "wave 3 extent {:.4} is not the largest (wave 1 {:.4}, wave 5 {:.4})",
                    e3, e1, e5
                ),
            });
        }
        RuleOutcome::Pass
    }
}

/// Rule 5: the price ranges of waves 1 and 4 must not overlap at all (touching counts).
pub struct Wave1Wave4RangeOverlap;

impl WaveRule for Wave1Wave4RangeOverlap {
    fn name(&self) -> &'static str {
        rules::WAVE1_WAVE4_RANGE_OVERLAP
    }

    fn check(&self, cycle: &CycleView) -> RuleOutcome {
        let (Some(w1), Some(w4)) = (cycle.closed(WaveLabel::One), cycle.closed(WaveLabel::Four)) else {
            return RuleOutcome::NotApplicable;
        };
        let (Some(w1_end), Some(w4_end)) = (w1.end_price, w4.end_price) else {
            return RuleOutcome::NotApplicable;
        };

        let (lo1, hi1) = (w1.start_price.min(w1_end), w1.start_price.max(w1_end));
        let (lo4, hi4) = (w4.start_price.min(w4_end), w4.start_price.max(w4_end));

        if lo1.max(lo4) <= hi1.min(hi4) {
            return RuleOutcome::Fail(Violation {
                rule: self.name(),
                timestamp: w4.end_timestamp.unwrap_or(w4.start_timestamp),
                price: w4_end,
                reason: format!(
                    "wave 4 range [{:.4}, {:.4}] overlaps wave 1 range [{:.4}, {:.4}]",
                    lo4, hi4, lo1, hi1
                ),
            });
        }
        RuleOutcome::Pass
    }
}

/// Fixed evaluation order.
pub static RULES: [&dyn WaveRule; 5] = [
    &Wave3Confirmation,
    &Wave2Retracement,
    &Wave4Overlap,
    &Wave3Longest,
    &Wave1Wave4RangeOverlap,
];

pub struct RuleValidator;

impl RuleValidator {
    /// Validates the waves of the current cycle (`cycle[0]` is wave 1).
    /// The corrective leg (A-B-C) carries no rules.
    pub fn validate(cycle: &[Wave]) -> Verdict {
        let view = CycleView::new(cycle);

        for rule in RULES.iter() {
            match rule.check(&view) {
                RuleOutcome::Fail(violation) => return Verdict::Invalid(violation),
                RuleOutcome::Pending => return Verdict::Provisional,
                RuleOutcome::Pass | RuleOutcome::NotApplicable => {}
            }
        }

        if view.closed(WaveLabel::Three).is_some() {
            Verdict::Valid
        } else {
            Verdict::Provisional
        }
    }
}
