use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use wave_sniper::data::{fixtures, load_bars};
use wave_sniper::{Cli, run_cli};

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn fixture_csv() -> String {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
    for bar in fixtures::impulse_then_correction() {
        let date = chrono::DateTime::from_timestamp_millis(bar.timestamp_ms)
            .unwrap()
            .format("%Y-%m-%d");
        csv.push_str(&format!(
            "{},{},{},{},{},1000\n",
            date, bar.open, bar.high, bar.low, bar.close
        ));
    }
    csv
}

#[test]
fn test_csv_file_round_trips_into_bars() {
    let file = write_temp(".csv", &fixture_csv());
    let bars = load_bars(file.path()).unwrap();
    assert_eq!(bars, fixtures::impulse_then_correction().into_iter().map(|b| b.with_volume(1000.0)).collect::<Vec<_>>());
}

#[test]
fn test_cli_json_output() {
    let file = write_temp(".csv", &fixture_csv());
    let path = file.path().to_str().unwrap();
    let args = Cli::parse_from(["wave-sniper", path, "--format", "json"]);

    let out = run_cli(&args).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["impulsePattern"], true);
    assert_eq!(value["correctivePattern"], true);
    assert_eq!(value["waves"].as_array().unwrap().len(), 8);
    assert_eq!(value["waves"][0]["label"], "1");
}

#[test]
fn test_cli_table_output_and_config_file() {
    let bars = write_temp(".json", &serde_json::to_string(&fixtures::wave4_into_wave1()).unwrap());
    let config = write_temp(".json", r#"{ "pivotThreshold": 0.05, "minBars": 20 }"#);

    let args = Cli::parse_from([
        "wave-sniper",
        bars.path().to_str().unwrap(),
        "--config",
        config.path().to_str().unwrap(),
        "--max-bars",
        "0",
    ]);
    let resolved = args.resolve_config().unwrap();
    assert_eq!(resolved.min_bars, 20);
    assert_eq!(resolved.max_bars, None);

    let out = run_cli(&args).unwrap();
    assert!(out.contains("wave4-overlap"));
    assert!(out.contains("[1d]"));
}

#[test]
fn test_cli_reports_engine_errors() {
    let short = fixtures::monotonic_ramp(5, 100.0, 1.0);
    let file = write_temp(".json", &serde_json::to_string(&short).unwrap());
    let args = Cli::parse_from(["wave-sniper", file.path().to_str().unwrap()]);

    let err = run_cli(&args).unwrap_err();
    assert!(format!("{:#}", err).contains("Insufficient data"));
}

#[test]
fn test_cli_rejects_unknown_extension() {
    let file = write_temp(".txt", "nothing");
    let args = Cli::parse_from(["wave-sniper", file.path().to_str().unwrap()]);
    assert!(run_cli(&args).is_err());
}
