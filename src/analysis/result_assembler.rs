use crate::analysis::fib_calculator::FibCalculator;
use crate::analysis::wave_sequencer::SequencerOutput;
use crate::config::WaveConfig;
use crate::domain::{Wave, WaveLabel};
use crate::errors::WaveError;
use crate::models::{AnalysisResult, AnalysisStatus, Trend};

const IMPULSE_LEG: [WaveLabel; 5] = [
    WaveLabel::One,
    WaveLabel::Two,
    WaveLabel::Three,
    WaveLabel::Four,
    WaveLabel::Five,
];
const CORRECTIVE_LEG: [WaveLabel; 3] = [WaveLabel::A, WaveLabel::B, WaveLabel::C];

pub struct ResultAssembler;

impl ResultAssembler {
    /// Pure aggregation of the sequencer output into the public result.
    pub fn assemble(
        output: SequencerOutput,
        current_price: f64,
        pivot_count: usize,
        config: &WaveConfig,
    ) -> Result<AnalysisResult, WaveError> {
        let live = output.live.into_waves();

        // The last live wave always ends at the final pivot
        let Some(current_wave) = live.last().cloned() else {
            return Err(WaveError::DegeneratePivotSequence {
                pivots: pivot_count,
                threshold_pct: config.pivot_threshold.value() * 100.0,
            });
        };

        let fib_targets = FibCalculator::targets(&live, current_price, config);

        let confirmed = Self::has_confirmed_wave3(&live);
        let status = if confirmed {
            AnalysisStatus::Confirmed
        } else {
            AnalysisStatus::NoConfirmedWave
        };
        let trend = if confirmed {
            Self::trend(&live, current_price)
        } else {
            Trend::Neutral
        };

        let impulse_pattern = Self::leg_complete(&live, &IMPULSE_LEG);
        let corrective_pattern = Self::leg_complete(&live, &CORRECTIVE_LEG);

        let waves: Vec<Wave> = live
            .into_iter()
            .filter(Wave::is_closed_and_valid)
            .collect();

        Ok(AnalysisResult {
            status,
            waves,
            invalid_waves: output.invalid_waves,
            current_wave,
            fib_targets,
            trend,
            impulse_pattern,
            corrective_pattern,
            current_price,
            pivot_count,
            restarts: output.restarts,
        })
    }

    /// Every closed wave 3 left in the live count has passed the confirmation gate.
    fn has_confirmed_wave3(live: &[Wave]) -> bool {
        live.iter()
            .any(|w| w.label == WaveLabel::Three && w.is_closed_and_valid())
    }

    /// Net direction from the earliest live wave 1 start to the latest price.
    fn trend(live: &[Wave], current_price: f64) -> Trend {
        let Some(origin) = live.iter().find(|w| w.label == WaveLabel::One) else {
            return Trend::Neutral;
        };
        let delta = current_price - origin.start_price;
        if delta > 0.0 {
            Trend::Bullish
        } else if delta < 0.0 {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }

    /// True when some cycle holds every label of `leg`, each closed and valid.
    fn leg_complete(live: &[Wave], leg: &[WaveLabel]) -> bool {
        live.iter()
            .filter(|w| w.label == leg[0] && w.is_closed_and_valid())
            .any(|first| {
                leg.iter().all(|label| {
                    live.iter().any(|w| {
                        w.cycle == first.cycle && w.label == *label && w.is_closed_and_valid()
                    })
                })
            })
    }
}
