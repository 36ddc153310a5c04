use itertools::Itertools;

use crate::config::{DEBUG_FLAGS, PivotPct};
use crate::domain::{Bar, Pivot, PivotKind};
use crate::errors::WaveError;

pub struct PivotExtractor;

impl PivotExtractor {
    /// Zigzag reduction of a bar series into alternating swing pivots.
    ///
    /// The first pivot is the extreme the series started from once the first
    /// threshold-sized move is seen; the last pivot is the running (unconfirmed) extreme at the
    /// tail. Fewer than two pivots is a hard failure.
    pub fn extract(bars: &[Bar], threshold: PivotPct) -> Result<Vec<Pivot>, WaveError> {
        let Some(first) = bars.first() else {
            return Err(WaveError::InsufficientData {
                found: 0,
                required: 1,
            });
        };

        let mut pivots: Vec<Pivot> = Vec::new();

        // PASS 1: Undecided until price travels `threshold` between the running high and low.
        let mut hi = Pivot::new(0, first.timestamp_ms, first.high, PivotKind::Peak);
        let mut lo = Pivot::new(0, first.timestamp_ms, first.low, PivotKind::Trough);
        let mut candidate: Option<Pivot> = None;

        for (i, bar) in bars.iter().enumerate().skip(1) {
            match candidate.as_mut() {
                None => {
                    if bar.high > hi.price {
                        hi = Pivot::new(i, bar.timestamp_ms, bar.high, PivotKind::Peak);
                    }
                    if bar.low < lo.price {
                        lo = Pivot::new(i, bar.timestamp_ms, bar.low, PivotKind::Trough);
                    }

                    let rose = lo.bar_index < hi.bar_index && hi.price >= threshold.reversal_up_from(lo.price);
                    let fell = hi.bar_index < lo.bar_index && lo.price <= threshold.reversal_down_from(hi.price);

                    if rose {
                        pivots.push(lo);
                        candidate = Some(hi);
                    } else if fell {
                        pivots.push(hi);
                        candidate = Some(lo);
                    }
                }
                Some(cand) => {
                    // PASS 2: Extend the candidate, or confirm it once price reverses far enough.
                    let (extreme, reversed, next) = match cand.kind {
                        PivotKind::Peak => (
                            bar.high,
                            bar.low <= threshold.reversal_down_from(cand.price),
                            Pivot::new(i, bar.timestamp_ms, bar.low, PivotKind::Trough),
                        ),
                        PivotKind::Trough => (
                            bar.low,
                            bar.high >= threshold.reversal_up_from(cand.price),
                            Pivot::new(i, bar.timestamp_ms, bar.high, PivotKind::Peak),
                        ),
                    };

                    if cand.kind.is_more_extreme(extreme, cand.price) {
                        *cand = Pivot::new(i, bar.timestamp_ms, extreme, cand.kind);
                    } else if reversed {
                        if DEBUG_FLAGS.log_pivots {
                            log::debug!(
                                "Pivot confirmed: {} {:.4} @ bar {}",
                                cand.kind,
                                cand.price,
                                cand.bar_index
                            );
                        }
                        pivots.push(*cand);
                        *cand = next;
                    }
                }
            }
        }

        // The tail extreme closes the sequence
        if let Some(tail) = candidate {
            pivots.push(tail);
        }

        let pivots = Self::merge_same_direction(pivots);

        if pivots.len() < 2 {
            return Err(WaveError::DegeneratePivotSequence {
                pivots: pivots.len(),
                threshold_pct: threshold.value() * 100.0,
            });
        }

        Ok(pivots)
    }

    /// Collapses runs of same-kind pivots into their most extreme member.
    /// On equal prices the earlier pivot survives.
    pub fn merge_same_direction(pivots: Vec<Pivot>) -> Vec<Pivot> {
        let mut merged: Vec<Pivot> = Vec::with_capacity(pivots.len());

        for pivot in pivots {
            match merged.last_mut() {
                Some(last) if last.kind == pivot.kind => {
                    if pivot.kind.is_more_extreme(pivot.price, last.price) {
                        *last = pivot;
                    }
                }
                _ => merged.push(pivot),
            }
        }

        merged
    }

    pub fn is_alternating(pivots: &[Pivot]) -> bool {
        pivots.iter().tuple_windows().all(|(a, b)| a.kind != b.kind)
    }
}
