use std::sync::Arc;
use std::time::Duration;

use wave_sniper::data::fixtures;
use wave_sniper::engine::{JobRequest, WaveEngine, analyze_many};
use wave_sniper::{WAVE_ANALYSIS, WaveConfig, WaveError};

const TIMEOUT: Duration = Duration::from_secs(30);

#[test]
fn test_queue_drains_every_symbol() {
    let mut engine = WaveEngine::new(WAVE_ANALYSIS);
    engine.load_series("IMPULSE", fixtures::impulse_then_correction());
    engine.load_series("OVERLAP", fixtures::wave4_into_wave1());
    engine.load_series("RAMP", fixtures::monotonic_ramp(60, 100.0, 1.0));
    assert_eq!(engine.get_queue_len(), 3);

    assert!(engine.run_until_idle(TIMEOUT));
    assert_eq!(engine.get_queue_len(), 0);
    assert!(engine.get_worker_status_msg().is_none());

    let impulse = engine.get_result("IMPULSE").unwrap();
    assert!(impulse.impulse_pattern && impulse.corrective_pattern);
    assert_eq!(engine.get_result("OVERLAP").unwrap().restarts, 1);
    assert!(engine.get_result("RAMP").unwrap().waves.is_empty());
    assert_eq!(engine.get_bar_count("RAMP"), 60);
}

#[test]
fn test_failures_are_kept_per_symbol() {
    let mut engine = WaveEngine::default();
    engine.load_series("SHORT", fixtures::monotonic_ramp(10, 100.0, 1.0));
    engine.load_series("GOOD", fixtures::wave1_then_pullback());

    assert!(engine.run_until_idle(TIMEOUT));

    let (busy, err) = engine.get_symbol_status("SHORT");
    assert!(!busy);
    assert_eq!(err, Some(WaveError::InsufficientData { found: 10, required: 50 }));
    assert!(engine.get_result("SHORT").is_none());
    assert!(engine.get_result("GOOD").is_some());
}

#[test]
fn test_override_and_recalc() {
    let mut engine = WaveEngine::default();
    engine.load_series("SHORT", fixtures::monotonic_ramp(20, 100.0, 1.0));
    assert!(engine.run_until_idle(TIMEOUT));
    assert!(engine.get_result("SHORT").is_none());

    engine.set_config_override("SHORT", WaveConfig::default().with_min_bars(10));
    engine.force_recalc("SHORT");
    engine.force_recalc("SHORT");
    assert_eq!(engine.get_queue_len(), 1);

    assert!(engine.run_until_idle(TIMEOUT));
    assert!(engine.get_result("SHORT").is_some());
    assert_eq!(engine.get_symbol_status("SHORT").1, None);
}

#[test]
fn test_update_config_requeues_and_applies() {
    let mut engine = WaveEngine::default();
    engine.load_series("SHORT", fixtures::monotonic_ramp(20, 100.0, 1.0));
    engine.load_series("PINNED", fixtures::monotonic_ramp(20, 100.0, 1.0));
    engine.set_config_override("PINNED", WaveConfig::default());
    assert!(engine.run_until_idle(TIMEOUT));
    assert!(engine.get_result("SHORT").is_none());

    engine.update_config(WaveConfig::default().with_min_bars(10));
    assert_eq!(engine.current_config.min_bars, 10);
    assert_eq!(engine.get_queue_len(), 2);

    assert!(engine.run_until_idle(TIMEOUT));
    assert!(engine.get_result("SHORT").is_some());
    // The override still demands 50 bars
    assert!(engine.get_result("PINNED").is_none());
}

#[test]
fn test_global_recalc_puts_priority_first() {
    let mut engine = WaveEngine::default();
    engine.load_series("A", fixtures::monotonic_ramp(60, 100.0, 1.0));
    engine.load_series("B", fixtures::monotonic_ramp(60, 100.0, 1.0));
    engine.load_series("C", fixtures::monotonic_ramp(60, 100.0, 1.0));
    assert!(engine.run_until_idle(TIMEOUT));

    engine.trigger_global_recalc(Some("C"));
    let order: Vec<&str> = engine.queue.iter().map(String::as_str).collect();
    assert_eq!(order, vec!["C", "A", "B"]);
}

#[test]
fn test_batch_matches_single_runs() {
    let requests: Vec<JobRequest> = [
        ("IMPULSE", fixtures::impulse_then_correction()),
        ("OVERLAP", fixtures::wave4_into_wave1()),
    ]
    .into_iter()
    .map(|(symbol, bars)| JobRequest {
        symbol: symbol.to_string(),
        bars: Arc::new(bars),
        config: WaveConfig::default(),
    })
    .collect();

    let results = analyze_many(&requests);
    for (req, res) in requests.iter().zip(&results) {
        let single = wave_sniper::analyze_waves(&req.bars, &req.config).unwrap();
        assert_eq!(res.symbol, req.symbol);
        assert_eq!(res.result.as_deref(), Ok(&single));
    }
}
