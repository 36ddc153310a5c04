use chrono::DateTime;

pub type AppInstant = std::time::Instant;

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_5_MIN: i64 = Self::MS_IN_MIN * 5;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_MIN * 15;
    pub const MS_IN_30_MIN: i64 = Self::MS_IN_MIN * 30;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_4_H: i64 = Self::MS_IN_H * 4;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    pub const INTRADAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Convert interval in milliseconds to exchange-style shorthand (e.g. `30m`, `1d`).
    pub fn interval_to_string(interval_ms: i64) -> &'static str {
        match interval_ms {
            Self::MS_IN_MIN => "1m",
            Self::MS_IN_5_MIN => "5m",
            Self::MS_IN_15_MIN => "15m",
            Self::MS_IN_30_MIN => "30m",
            Self::MS_IN_H => "1h",
            Self::MS_IN_4_H => "4h",
            Self::MS_IN_D => "1d",
            Self::MS_IN_W => "1w",
            _ => "unknown",
        }
    }
}

/// Used for display purposes. Daily-or-coarser series show the date only.
pub fn epoch_ms_to_utc(epoch_ms: i64, interval_ms: i64) -> String {
    let fmt = if interval_ms >= TimeUtils::MS_IN_D {
        TimeUtils::STANDARD_TIME_FORMAT
    } else {
        TimeUtils::INTRADAY_TIME_FORMAT
    };
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(fmt).to_string(),
        None => format!("{}ms", epoch_ms),
    }
}

/// Median spacing between consecutive timestamps (0 for fewer than two).
pub fn dominant_interval_ms(timestamps: &[i64]) -> i64 {
    let mut gaps: Vec<i64> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    if gaps.is_empty() {
        return 0;
    }
    gaps.sort_unstable();
    gaps[gaps.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_formatting() {
        assert_eq!(epoch_ms_to_utc(1_704_067_200_000, TimeUtils::MS_IN_D), "2024-01-01");
        assert_eq!(
            epoch_ms_to_utc(1_704_067_200_000 + TimeUtils::MS_IN_H, TimeUtils::MS_IN_H),
            "2024-01-01 01:00"
        );
    }

    #[test]
    fn test_dominant_interval() {
        let ts = [0, 10, 20, 30, 50];
        assert_eq!(dominant_interval_ms(&ts), 10);
        assert_eq!(dominant_interval_ms(&[5]), 0);
        assert_eq!(TimeUtils::interval_to_string(dominant_interval_ms(&[0, TimeUtils::MS_IN_D])), "1d");
    }
}
