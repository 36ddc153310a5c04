use crate::config::{DEBUG_FLAGS, WaveConfig};
use crate::domain::{Wave, WaveDirection, WaveRole};
use crate::models::{FibTarget, LevelLabel};
use crate::utils::within_relative_tolerance;

pub struct FibCalculator;

impl FibCalculator {
    /// Fibonacci levels for the current (open) wave, the last entry of `live`.
    ///
    /// * Retracements are measured against the closed wave ending exactly where the current one
    ///   starts. After a restart that wave is gone, so no retracements are produced.
    /// * Extensions are produced for an impulsive current wave once an earlier impulsive wave of
    ///   the same direction exists in its cycle; they are projected from the current wave's
    ///   start by multiples of the most recent such wave's extent.
    ///
    /// Levels closer than `confluence_tolerance_pct` of price are folded into the first one
    /// produced, which is flagged as a confluence. Non-positive prices are dropped.
    /// Output is sorted by price.
    pub fn targets(live: &[Wave], current_price: f64, config: &WaveConfig) -> Vec<FibTarget> {
        let Some((current, earlier)) = live.split_last() else {
            return Vec::new();
        };
        let mut levels: Vec<FibTarget> = Vec::new();

        // 1. Retracements of the adjacent closed wave
        if let Some((prev_start, prev_end)) = earlier
            .last()
            .filter(|w| w.is_complete && w.end_timestamp == Some(current.start_timestamp))
            .and_then(|w| w.end_price.map(|end| (w.start_price, end)))
        {
            let span = prev_end - prev_start;
            for &ratio in config.retracement_ratios.iter() {
                let price = prev_end - ratio * span;
                Self::push_level(&mut levels, price, ratio, true, current, current_price, config);
            }
        }

        // 2. Extensions from the prior same-direction impulsive wave
        if current.role == WaveRole::Impulsive {
            if let Some(base_extent) = Self::prior_impulse(current, earlier).and_then(Wave::extent)
            {
                let sign = current.direction.sign();
                for &ratio in config.extension_ratios.iter() {
                    let price = current.start_price + sign * ratio * base_extent;
                    Self::push_level(&mut levels, price, ratio, false, current, current_price, config);
                }
            }
        }

        levels.sort_by(|a, b| a.price.total_cmp(&b.price));

        if DEBUG_FLAGS.log_fib {
            for level in &levels {
                log::debug!(
                    "Fib {} {:.3} @ {:.4} ({}){}",
                    if level.is_retracement { "retracement" } else { "extension" },
                    level.ratio,
                    level.price,
                    level.label,
                    if level.confluence { " [confluence]" } else { "" }
                );
            }
        }

        levels
    }

    /// Support/resistance relative to the current price, mirrored for a falling wave.
    pub fn label_for(price: f64, current_price: f64, direction: WaveDirection) -> LevelLabel {
        let above = price > current_price;
        match (direction, above) {
            (WaveDirection::Up, true) | (WaveDirection::Down, false) => LevelLabel::Resistance,
            (WaveDirection::Up, false) | (WaveDirection::Down, true) => LevelLabel::Support,
        }
    }

    /// Most recent closed impulsive wave of the current cycle moving the same way.
    fn prior_impulse<'a>(current: &Wave, earlier: &'a [Wave]) -> Option<&'a Wave> {
        earlier
            .iter()
            .rev()
            .take_while(|w| w.cycle == current.cycle)
            .find(|w| {
                w.role == WaveRole::Impulsive && w.direction == current.direction && w.is_complete
            })
    }

    fn push_level(
        levels: &mut Vec<FibTarget>,
        price: f64,
        ratio: f64,
        is_retracement: bool,
        current: &Wave,
        current_price: f64,
        config: &WaveConfig,
    ) {
        if !price.is_finite() || price <= 0.0 {
            return;
        }

        if let Some(existing) = levels
            .iter_mut()
            .find(|l| within_relative_tolerance(l.price, price, config.confluence_tolerance_pct))
        {
            existing.confluence = true;
            existing.is_retracement |= is_retracement;
            existing.is_extension |= !is_retracement;
            return;
        }

        levels.push(FibTarget {
            price,
            ratio,
            label: Self::label_for(price, current_price, current.direction),
            is_retracement,
            is_extension: !is_retracement,
            confluence: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Pivot, PivotKind, WaveLabel};

    /// Live waves along a pivot path, labelled from wave 1 in cycle 0. The last wave is open.
    fn live_from_path(prices: &[f64]) -> Vec<Wave> {
        let first_kind = if prices[1] > prices[0] {
            PivotKind::Trough
        } else {
            PivotKind::Peak
        };
        let pivots: Vec<Pivot> = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let kind = if i % 2 == 0 { first_kind } else { first_kind.opposite() };
                Pivot::new(i, i as i64 * 1_000, p, kind)
            })
            .collect();

        let mut label = WaveLabel::One;
        let mut waves = Vec::new();
        for pair in pivots.windows(2) {
            let mut w = Wave::open(label, 0, &pair[0]);
            if pair[1].bar_index + 1 < pivots.len() {
                w.close(&pair[1]);
            }
            waves.push(w);
            label = label.next();
        }
        waves
    }

    fn extensions(targets: &[FibTarget]) -> Vec<&FibTarget> {
        targets.iter().filter(|t| t.is_extension).collect()
    }

    #[test]
    fn test_wave2_retracement_levels() {
        let live = live_from_path(&[100.0, 200.0, 160.0]);

        let targets = FibCalculator::targets(&live, 170.0, &WaveConfig::default());

        assert_eq!(targets.len(), 4);
        assert!(targets.iter().all(|t| t.is_retracement && !t.is_extension));
        let golden = targets.iter().find(|t| t.ratio == 0.618).unwrap();
        assert!((golden.price - 138.2).abs() < 1e-9);
        // Falling wave: labels are mirrored, so a level below price reads as resistance
        assert_eq!(golden.label, LevelLabel::Resistance);
        let full = targets.iter().find(|t| t.ratio == 1.0).unwrap();
        assert!((full.price - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_wave3_extends_from_wave1() {
        let live = live_from_path(&[100.0, 120.0, 110.0, 125.0]);

        let targets = FibCalculator::targets(&live, 125.0, &WaveConfig::default());

        let ext = extensions(&targets);
        assert_eq!(ext.len(), 3);
        let e1618 = ext.iter().find(|t| t.ratio == 1.618).unwrap();
        assert!((e1618.price - (110.0 + 1.618 * 20.0)).abs() < 1e-9);
        assert_eq!(e1618.label, LevelLabel::Resistance);
        // Sorted ascending
        assert!(targets.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_wave5_extends_from_wave3() {
        let live = live_from_path(&[100.0, 120.0, 110.0, 150.0, 130.0, 160.0]);
        assert_eq!(live.last().unwrap().label, WaveLabel::Five);

        let targets = FibCalculator::targets(&live, 160.0, &WaveConfig::default());

        let e1618 = extensions(&targets).into_iter().find(|t| t.ratio == 1.618).unwrap();
        assert!((e1618.price - (130.0 + 1.618 * 40.0)).abs() < 1e-9);
    }

    #[test]
    fn test_wave_b_extends_from_wave5() {
        let live = live_from_path(&[100.0, 120.0, 110.0, 150.0, 130.0, 160.0, 135.0, 150.0]);
        let current = live.last().unwrap();
        assert_eq!(current.label, WaveLabel::B);
        assert_eq!(current.role, WaveRole::Impulsive);

        let targets = FibCalculator::targets(&live, 150.0, &WaveConfig::default());

        let ext = extensions(&targets);
        assert_eq!(ext.len(), 3);
        let e1618 = ext.iter().find(|t| t.ratio == 1.618).unwrap();
        assert!((e1618.price - (135.0 + 1.618 * 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_corrective_and_first_waves_have_no_extensions() {
        let wave2 = live_from_path(&[100.0, 120.0, 115.0]);
        assert!(extensions(&FibCalculator::targets(&wave2, 115.0, &WaveConfig::default())).is_empty());

        let wave1 = live_from_path(&[100.0, 130.0]);
        assert!(FibCalculator::targets(&wave1, 130.0, &WaveConfig::default()).is_empty());
        assert!(FibCalculator::targets(&[], 130.0, &WaveConfig::default()).is_empty());
    }

    #[test]
    fn test_non_adjacent_previous_wave_gives_no_retracements() {
        let mut live = live_from_path(&[100.0, 200.0, 160.0]);
        // Restarted wave: starts two pivots after the last closed wave ended
        let restarted = Wave::open(WaveLabel::One, 1, &Pivot::new(3, 3_000, 150.0, PivotKind::Trough));
        live.truncate(1);
        live.push(restarted);

        assert!(FibCalculator::targets(&live, 170.0, &WaveConfig::default()).is_empty());
    }

    #[test]
    fn test_non_positive_levels_are_dropped() {
        // Steep bearish wave 1, then an open bearish wave 3 from 40
        let live = live_from_path(&[200.0, 20.0, 40.0, 30.0]);

        let targets = FibCalculator::targets(&live, 30.0, &WaveConfig::default());

        assert!(!targets.is_empty());
        assert!(targets.iter().all(|t| t.price > 0.0));
        assert!(extensions(&targets).is_empty());
    }

    #[test]
    fn test_close_levels_merge_into_confluence() {
        let live = live_from_path(&[100.0, 200.0, 180.0]);
        let mut config = WaveConfig::default();
        config.retracement_ratios = vec![0.5, 0.5004, 0.618].into();

        let targets = FibCalculator::targets(&live, 180.0, &config);

        assert_eq!(targets.len(), 2);
        let mid = targets.iter().find(|t| t.ratio == 0.5).unwrap();
        assert!(mid.confluence);
        assert!(!targets.iter().find(|t| t.ratio == 0.618).unwrap().confluence);
    }

    #[test]
    fn test_labels_mirror_for_falling_wave() {
        assert_eq!(FibCalculator::label_for(90.0, 100.0, WaveDirection::Up), LevelLabel::Support);
        assert_eq!(FibCalculator::label_for(110.0, 100.0, WaveDirection::Up), LevelLabel::Resistance);
        assert_eq!(FibCalculator::label_for(90.0, 100.0, WaveDirection::Down), LevelLabel::Resistance);
        assert_eq!(FibCalculator::label_for(110.0, 100.0, WaveDirection::Down), LevelLabel::Support);
    }
}
