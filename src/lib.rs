#![allow(clippy::collapsible_if)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod alternative;
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod models;
pub mod report;
pub mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

// Re-export commonly used types outside of crate
pub use analysis::analyze_waves;
pub use config::{WAVE_ANALYSIS, WaveConfig};
pub use domain::{Bar, Wave, WaveLabel};
pub use engine::WaveEngine;
pub use errors::WaveError;
pub use models::{AnalysisResult, AnalysisStatus, FibTarget, Trend};
pub use report::{OutputFormat, WaveReport};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Elliott Wave count and validation for OHLC bar files", long_about = None)]
pub struct Cli {
    /// Bar file (.csv or .json)
    pub file: PathBuf,

    /// Zigzag reversal threshold as a fraction (0.05 = 5%)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Reject inputs with fewer bars than this
    #[arg(long)]
    pub min_bars: Option<usize>,

    /// Analyse only the most recent N bars (0 = all)
    #[arg(long)]
    pub max_bars: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// JSON config file; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// File config (or the built-in blueprint), then flag overrides.
    pub fn resolve_config(&self) -> Result<WaveConfig> {
        let mut config = match &self.config {
            Some(path) => WaveConfig::from_json_file(path)?,
            None => WAVE_ANALYSIS,
        };

        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        if let Some(min_bars) = self.min_bars {
            config = config.with_min_bars(min_bars);
        }
        if let Some(max_bars) = self.max_bars {
            config = config.with_max_bars((max_bars > 0).then_some(max_bars));
        }

        config.validate()?;
        Ok(config)
    }
}

/// Entry point for the binary: load, analyse, render.
pub fn run_cli(args: &Cli) -> Result<String> {
    let config = args.resolve_config()?;
    let bars = data::load_bars(&args.file)?;

    let result = analyze_waves(&bars, &config)
        .with_context(|| format!("Wave analysis failed for {}", args.file.display()))?;

    let timestamps: Vec<i64> = bars.iter().map(|b| b.timestamp_ms).collect();
    let interval_ms = utils::dominant_interval_ms(&timestamps);
    let symbol = symbol_from_path(&args.file);

    WaveReport::new(&symbol, &result, interval_ms).render(args.format)
}

/// `data/BTCUSDT_1d.csv` -> `BTCUSDT_1d`
pub fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}
