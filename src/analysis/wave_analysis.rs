use crate::analysis::pivot_extractor::PivotExtractor;
use crate::analysis::result_assembler::ResultAssembler;
use crate::analysis::wave_sequencer::WaveSequencer;
use crate::config::{DEBUG_FLAGS, WaveConfig};
use crate::data::recent_window;
use crate::domain::{Bar, validate_bars};
use crate::errors::WaveError;
use crate::models::AnalysisResult;
use crate::trace_time;

/// Runs the full pipeline over one bar series: pivots, wave labelling, validation, fib levels.
///
/// Stateless and deterministic. The input is never modified and nothing outlives the call, so
/// callers may run any number of these concurrently (one per symbol).
pub fn analyze_waves(bars: &[Bar], config: &WaveConfig) -> Result<AnalysisResult, WaveError> {
    trace_time!("Analyze Waves", 5_000, {
        // 1. Configuration and input size
        config.validate()?;

        if bars.len() < config.min_bars {
            return Err(WaveError::InsufficientData {
                found: bars.len(),
                required: config.min_bars,
            });
        }

        // 2. Cap history, then reject malformed bars in the analysed window.
        // Reported indices refer to the caller's slice.
        let window = recent_window(bars, config.max_bars);
        let offset = bars.len() - window.len();
        validate_bars(window).map_err(|e| match e {
            WaveError::InvalidBar { index, reason } => WaveError::InvalidBar {
                index: index + offset,
                reason,
            },
            other => other,
        })?;

        // 3. Zigzag
        let pivots = PivotExtractor::extract(window, config.pivot_threshold)?;

        if DEBUG_FLAGS.log_pivots {
            log::info!(
                "{} pivot(s) from {} bar(s) at {} threshold",
                pivots.len(),
                window.len(),
                config.pivot_threshold
            );
        }

        // 4. Label and validate
        let output = WaveSequencer::new(&pivots).run();

        // 5. Aggregate
        let current_price = window.last().map(|b| b.close).unwrap_or_default();
        ResultAssembler::assemble(output, current_price, pivots.len(), config)
    })
}
