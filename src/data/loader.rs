//! Caller-side normalisation of historical bar files into canonical `Bar`s.
//!
//! Accepted shapes:
//! - CSV with a header row. Column names are matched case-insensitively.
//! - JSON: an array of bar objects, or an object wrapping that array under `bars`, `data`,
//!   `candles` or `klines`.
//!
//! The timestamp may live under any of [`TIMESTAMP_KEYS`] and may be epoch seconds, epoch
//! milliseconds, RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` date (UTC).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::domain::Bar;

pub const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "date", "datetime", "open_time", "opentime", "t"];
const OPEN_KEYS: &[&str] = &["open", "o"];
const HIGH_KEYS: &[&str] = &["high", "h"];
const LOW_KEYS: &[&str] = &["low", "l"];
const CLOSE_KEYS: &[&str] = &["close", "c", "adj_close"];
const VOLUME_KEYS: &[&str] = &["volume", "vol", "v"];
const JSON_WRAPPER_KEYS: &[&str] = &["bars", "data", "candles", "klines"];

/// Epoch values at or above this are taken as milliseconds (year 1973 in ms, year 5138 in s).
const EPOCH_MS_CUTOFF: f64 = 1e11;

/// Loads bars from a `.csv` or `.json` file, sorted by time with duplicate timestamps removed.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let bars = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            parse_bars_csv(file).with_context(|| format!("Failed to parse CSV {}", path.display()))?
        }
        "json" => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_bars_json(&raw).with_context(|| format!("Failed to parse JSON {}", path.display()))?
        }
        other => bail!("Unsupported bar file extension '{}' (expected csv or json)", other),
    };

    log::info!("Loaded {} bar(s) from {}", bars.len(), path.display());
    Ok(bars)
}

pub fn parse_bars_csv<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Missing CSV header row")?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let column = |keys: &[&str]| headers.iter().position(|h| keys.contains(&h.as_str()));
    let required = |keys: &[&str]| {
        column(keys).ok_or_else(|| anyhow!("No '{}' column in header {:?}", keys[0], headers))
    };

    let ts_col = required(TIMESTAMP_KEYS)?;
    let open_col = required(OPEN_KEYS)?;
    let high_col = required(HIGH_KEYS)?;
    let low_col = required(LOW_KEYS)?;
    let close_col = required(CLOSE_KEYS)?;
    let volume_col = column(VOLUME_KEYS);

    let mut bars = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad CSV record at row {}", row + 1))?;
        let field = |col: usize| record.get(col).unwrap_or("");
        let price = |col: usize, name: &str| -> Result<f64> {
            field(col)
                .parse::<f64>()
                .with_context(|| format!("Row {}: bad {} value '{}'", row + 1, name, field(col)))
        };

        let timestamp_ms = parse_timestamp_ms(field(ts_col))
            .ok_or_else(|| anyhow!("Row {}: unrecognised timestamp '{}'", row + 1, field(ts_col)))?;

        let mut bar = Bar::new(
            timestamp_ms,
            price(open_col, "open")?,
            price(high_col, "high")?,
            price(low_col, "low")?,
            price(close_col, "close")?,
        );
        if let Some(col) = volume_col {
            if let Ok(vol) = field(col).parse::<f64>() {
                bar = bar.with_volume(vol);
            }
        }
        bars.push(bar);
    }

    Ok(normalize(bars))
}

pub fn parse_bars_json(raw: &str) -> Result<Vec<Bar>> {
    let root: Value = serde_json::from_str(raw).context("Invalid JSON")?;

    let items = match &root {
        Value::Array(items) => items,
        Value::Object(map) => JSON_WRAPPER_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_array))
            .ok_or_else(|| anyhow!("JSON object has none of {:?}", JSON_WRAPPER_KEYS))?,
        _ => bail!("Expected a JSON array of bars"),
    };

    let bars = items
        .iter()
        .enumerate()
        .map(|(i, item)| bar_from_json(item).with_context(|| format!("Bar #{}", i)))
        .collect::<Result<Vec<Bar>>>()?;

    Ok(normalize(bars))
}

fn bar_from_json(item: &Value) -> Result<Bar> {
    let Value::Object(map) = item else {
        bail!("Expected an object, got {}", item);
    };
    // Case-insensitive lookup
    let fields: BTreeMap<String, &Value> = map
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect();
    let lookup = |keys: &[&str]| keys.iter().find_map(|k| fields.get(*k).copied());

    let price = |keys: &[&str]| -> Result<f64> {
        let value = lookup(keys).ok_or_else(|| anyhow!("Missing '{}'", keys[0]))?;
        json_number(value).ok_or_else(|| anyhow!("'{}' is not a number: {}", keys[0], value))
    };

    let ts_value = lookup(TIMESTAMP_KEYS).ok_or_else(|| anyhow!("Missing timestamp field"))?;
    let timestamp_ms = match ts_value {
        Value::Number(n) => n.as_f64().and_then(epoch_to_ms),
        Value::String(s) => parse_timestamp_ms(s),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Unrecognised timestamp {}", ts_value))?;

    let mut bar = Bar::new(
        timestamp_ms,
        price(OPEN_KEYS)?,
        price(HIGH_KEYS)?,
        price(LOW_KEYS)?,
        price(CLOSE_KEYS)?,
    );
    if let Some(vol) = lookup(VOLUME_KEYS).and_then(json_number) {
        bar = bar.with_volume(vol);
    }
    Ok(bar)
}

/// Numbers, or numeric strings (exchange APIs often quote prices).
fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses any supported timestamp representation into epoch milliseconds (UTC).
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(n) = raw.parse::<f64>() {
        return epoch_to_ms(n);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn epoch_to_ms(n: f64) -> Option<i64> {
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    let ms = if n >= EPOCH_MS_CUTOFF { n } else { n * 1000.0 };
    Some(ms.round() as i64)
}

/// Sorts by time and keeps the last bar for any repeated timestamp.
fn normalize(mut bars: Vec<Bar>) -> Vec<Bar> {
    let was_sorted = bars.is_sorted_by_key(|b| b.timestamp_ms);
    if !was_sorted {
        log::warn!("Bars were not in time order; sorting {} bar(s)", bars.len());
        bars.sort_by_key(|b| b.timestamp_ms);
    }

    let before = bars.len();
    let mut deduped: Vec<Bar> = Vec::with_capacity(before);
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.timestamp_ms == bar.timestamp_ms => *last = bar,
            _ => deduped.push(bar),
        }
    }
    if deduped.len() != before {
        log::warn!("Dropped {} duplicate timestamp(s)", before - deduped.len());
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(parse_timestamp_ms("1704067200"), Some(1_704_067_200_000));
        assert_eq!(parse_timestamp_ms("1704067200000"), Some(1_704_067_200_000));
        assert_eq!(parse_timestamp_ms("2024-01-01"), Some(1_704_067_200_000));
        assert_eq!(parse_timestamp_ms("2024-01-01 00:00:00"), Some(1_704_067_200_000));
        assert_eq!(parse_timestamp_ms("2024-01-01T01:00:00+01:00"), Some(1_704_067_200_000));
        assert_eq!(parse_timestamp_ms("yesterday"), None);
        assert_eq!(parse_timestamp_ms(""), None);
    }

    #[test]
    fn test_csv_with_date_column() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2024-01-02,101,103,100,102,10\n\
                   2024-01-01,100,102,99,101,12\n";
        let bars = parse_bars_csv(csv.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        // sorted
        assert_eq!(bars[0].timestamp_ms, 1_704_067_200_000);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[1].volume, Some(10.0));
    }

    #[test]
    fn test_csv_missing_close_column() {
        let csv = "time,open,high,low\n1,1,1,1\n";
        let err = parse_bars_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn test_json_wrapped_with_string_prices() {
        let json = r#"{ "bars": [
            { "open_time": 1704067200000, "o": "100", "h": "102", "l": "99", "c": "101" },
            { "open_time": 1704153600000, "o": "101", "h": "103", "l": "100", "c": "102", "v": 5 }
        ] }"#;
        let bars = parse_bars_json(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].high, 103.0);
        assert_eq!(bars[1].volume, Some(5.0));
    }

    #[test]
    fn test_json_duplicates_keep_last() {
        let json = r#"[
            { "timestamp": "2024-01-01", "open": 1, "high": 2, "low": 1, "close": 2 },
            { "timestamp": "2024-01-01", "open": 1, "high": 3, "low": 1, "close": 3 }
        ]"#;
        let bars = parse_bars_json(json).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 3.0);
    }

    #[test]
    fn test_json_rejects_bad_shape() {
        assert!(parse_bars_json(r#"{ "rows": [] }"#).is_err());
        assert!(parse_bars_json(r#"[ { "open": 1 } ]"#).is_err());
        assert!(parse_bars_json("42").is_err());
    }
}
