//! The wave-labelling state machine.
//!
//! Pivots are consumed left to right. Each new pivot opens a wave from the previous pivot; the
//! rule validator then judges the current cycle. On a violation the current cycle is discarded
//! and labelling rewinds to the pivot where the discarded wave 2 ended.

use crate::analysis::rule_validator::{RuleValidator, Verdict};
use crate::config::DEBUG_FLAGS;
use crate::domain::{Pivot, Wave, WaveLabel};
use crate::models::WaveCount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    AwaitingWave1,
    InWave(WaveLabel),
    CycleComplete,
}

impl SequencerState {
    /// Label the next consumed pivot will receive.
    pub fn next_label(self) -> WaveLabel {
        match self {
            SequencerState::AwaitingWave1 | SequencerState::CycleComplete => WaveLabel::One,
            SequencerState::InWave(label) => label.next(),
        }
    }
}

/// Everything the sequencer produced for one pivot sequence.
#[derive(Debug, Clone)]
pub struct SequencerOutput {
    pub live: WaveCount,
    pub invalid_waves: Vec<Wave>,
    pub restarts: usize,
    pub final_state: SequencerState,
}

pub struct WaveSequencer<'a> {
    pivots: &'a [Pivot],
    state: SequencerState,
    live: WaveCount,
    invalid_waves: Vec<Wave>,
    /// Rewind pointer: pivot index where the current cycle's wave 1 starts.
    cycle_start: usize,
    cycle: usize,
    restarts: usize,
}

impl<'a> WaveSequencer<'a> {
    pub fn new(pivots: &'a [Pivot]) -> Self {
        Self {
            pivots,
            state: SequencerState::AwaitingWave1,
            live: WaveCount::new(),
            invalid_waves: Vec::new(),
            cycle_start: 0,
            cycle: 0,
            restarts: 0,
        }
    }

    /// Runs the state machine to the end of the pivot sequence.
    ///
    /// The wave ending at the final pivot is left open (the current wave). Restarts always land
    /// strictly after the cycle start, so the loop terminates.
    pub fn run(mut self) -> SequencerOutput {
        let last = self.pivots.len().saturating_sub(1);
        let mut next_pivot = self.cycle_start + 1;

        while next_pivot <= last {
            let label = self.state.next_label();
            let mut wave = Wave::open(label, self.cycle, &self.pivots[next_pivot - 1]);
            if next_pivot < last {
                wave.close(&self.pivots[next_pivot]);
            }
            self.live.push(wave);

            let verdict = RuleValidator::validate(self.live.current_cycle());

            if DEBUG_FLAGS.log_validator {
                log::debug!(
                    "Validator: cycle {} wave {} (pivot {}) -> {:?}",
                    self.cycle,
                    label,
                    next_pivot,
                    verdict
                );
            }

            match verdict {
                Verdict::Valid | Verdict::Provisional => {
                    self.advance(label);
                    next_pivot += 1;
                }
                Verdict::Invalid(violation) => {
                    let restart_at = self.restart_pivot();
                    let invalidation = violation.to_invalidation();

                    let discarded = self.live.discard_current_cycle();
                    if DEBUG_FLAGS.log_sequencer {
                        log::info!(
                            "Count invalidated ({}): discarding {} wave(s) of cycle {}, restarting wave 1 at pivot {} ({:.4})",
                            violation.rule,
                            discarded.len(),
                            self.cycle,
                            restart_at,
                            self.pivots[restart_at].price
                        );
                    }

                    self.invalid_waves.extend(discarded.into_iter().map(|mut w| {
                        w.invalidate(invalidation.clone());
                        w
                    }));

                    self.restarts += 1;
                    self.cycle_start = restart_at;
                    self.state = SequencerState::AwaitingWave1;
                    next_pivot = restart_at + 1;
                }
            }
        }

        SequencerOutput {
            live: self.live,
            invalid_waves: self.invalid_waves,
            restarts: self.restarts,
            final_state: self.state,
        }
    }

    fn advance(&mut self, label: WaveLabel) {
        if label == WaveLabel::C {
            self.live.seal_cycle();
            self.cycle_start += WaveLabel::CYCLE_LEN;
            self.cycle += 1;
            self.state = SequencerState::CycleComplete;

            if DEBUG_FLAGS.log_sequencer {
                log::debug!("Cycle {} complete at pivot {}", self.cycle - 1, self.cycle_start);
            }
        } else {
            self.state = SequencerState::InWave(label);
        }
    }

    /// The pivot where wave 2 of the current cycle ended.
    ///
    /// Every rule needs a closed wave 2, so this pivot always exists when a violation is
    /// reported. Pivots are strictly alternating and equal extremes were already resolved to the
    /// earliest bar during extraction, so the restart point is unique.
    fn restart_pivot(&self) -> usize {
        let wave2_end = self.cycle_start + WaveLabel::Two.position() + 1;
        wave2_end.min(self.pivots.len().saturating_sub(1))
    }
}
