use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use wave_sniper::data::fixtures;
use wave_sniper::utils::TimeUtils;

#[derive(Parser, Debug)]
#[command(about = "Writes the synthetic five-up / three-down demo series as JSON")]
struct Args {
    /// Output file
    #[arg(long, default_value = "demo_impulse_abc.json")]
    out: PathBuf,

    /// Bars interpolated between consecutive swing prices
    #[arg(long, default_value_t = 10)]
    bars_per_leg: usize,
}

fn main() -> Result<()> {
    // 1. Setup Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // 2. Build the series
    let bars = fixtures::from_pivot_path(
        fixtures::IMPULSE_THEN_CORRECTION,
        args.bars_per_leg,
        TimeUtils::MS_IN_D,
    );
    log::info!(
        "Swing path {:?} -> {} daily bars",
        fixtures::IMPULSE_THEN_CORRECTION,
        bars.len()
    );

    // 3. Sanity check: the demo must produce the full 8-wave count
    let result = wave_sniper::analyze_waves(&bars, &wave_sniper::WAVE_ANALYSIS.with_min_bars(2))
        .context("Demo series failed analysis")?;
    if !(result.impulse_pattern && result.corrective_pattern) {
        log::warn!(
            "Demo series did not produce a full count (got: {}); check --bars-per-leg",
            result.label_sequence()
        );
    }

    // 4. Save
    let json = serde_json::to_string_pretty(&bars)?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    log::info!("Wrote {}", args.out.display());
    Ok(())
}
