//! Deterministic synthetic bar series.
//!
//! Used by the test-suite and by the `make_demo_fixture` binary. A series is described by its
//! swing prices; bars are linearly interpolated between them so that every swing price lands
//! exactly on one bar's high (peaks) or low (troughs).

use crate::domain::Bar;
use crate::utils::TimeUtils;

/// 2024-01-01T00:00:00Z
pub const FIXTURE_START_MS: i64 = 1_704_067_200_000;

/// Hand-constructed five-wave advance followed by an A-B-C decline, plus a final rally that
/// confirms the end of wave C. Every impulse rule holds.
pub const IMPULSE_THEN_CORRECTION: &[f64] =
    &[100.0, 120.0, 110.0, 150.0, 130.0, 160.0, 135.0, 150.0, 120.0, 170.0];

/// Wave 4 (115) falls back below wave 1's end (120).
pub const WAVE4_INTO_WAVE1: &[f64] = &[100.0, 120.0, 110.0, 140.0, 115.0, 150.0, 130.0];

/// A wave 1 from 100 to 200, then an open wave 2 pulling back.
pub const WAVE1_THEN_PULLBACK: &[f64] = &[100.0, 200.0, 160.0];

/// Interpolates `bars_per_leg` bars per swing. Each bar opens at the previous close.
pub fn from_pivot_path(pivots: &[f64], bars_per_leg: usize, interval_ms: i64) -> Vec<Bar> {
    let Some(&first) = pivots.first() else {
        return Vec::new();
    };
    let steps = bars_per_leg.max(1);

    let mut closes = vec![first];
    for (from, to) in pivots.iter().zip(pivots.iter().skip(1)) {
        for k in 1..=steps {
            closes.push(from + (to - from) * (k as f64 / steps as f64));
        }
    }

    bars_from_closes(&closes, interval_ms)
}

/// A straight line of `n` daily bars, `step` per bar.
pub fn monotonic_ramp(n: usize, start: f64, step: f64) -> Vec<Bar> {
    let closes: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
    bars_from_closes(&closes, TimeUtils::MS_IN_D)
}

/// Scenario series with the default spacing (10 daily bars per swing).
pub fn impulse_then_correction() -> Vec<Bar> {
    from_pivot_path(IMPULSE_THEN_CORRECTION, 10, TimeUtils::MS_IN_D)
}

pub fn wave4_into_wave1() -> Vec<Bar> {
    from_pivot_path(WAVE4_INTO_WAVE1, 10, TimeUtils::MS_IN_D)
}

pub fn wave1_then_pullback() -> Vec<Bar> {
    from_pivot_path(WAVE1_THEN_PULLBACK, 30, TimeUtils::MS_IN_D)
}

/// Open = previous close, high/low = the body. The first bar is a doji at the first close.
pub fn bars_from_closes(closes: &[f64], interval_ms: i64) -> Vec<Bar> {
    let mut prev = closes.first().copied().unwrap_or_default();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = prev;
            prev = close;
            Bar::new(
                FIXTURE_START_MS + i as i64 * interval_ms,
                open,
                open.max(close),
                open.min(close),
                close,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate_bars;

    #[test]
    fn test_pivot_prices_land_on_bars() {
        let bars = from_pivot_path(&[100.0, 120.0, 110.0], 4, TimeUtils::MS_IN_H);
        assert_eq!(bars.len(), 9);
        assert_eq!(bars[4].close, 120.0);
        assert_eq!(bars[4].high, 120.0);
        assert_eq!(bars[8].low, 110.0);
        assert_eq!(bars[1].timestamp_ms - bars[0].timestamp_ms, TimeUtils::MS_IN_H);
    }

    #[test]
    fn test_fixtures_are_well_formed() {
        for bars in [
            impulse_then_correction(),
            wave4_into_wave1(),
            wave1_then_pullback(),
            monotonic_ramp(60, 100.0, 1.0),
        ] {
            assert!(bars.len() >= 50);
            assert!(validate_bars(&bars).is_ok());
        }
    }

    #[test]
    fn test_empty_path() {
        assert!(from_pivot_path(&[], 10, 1).is_empty());
    }
}
