// Wave detection pipeline: pivots -> sequencer (+ rules) -> fib levels -> result
pub mod fib_calculator;
pub mod pivot_extractor;
pub mod result_assembler;
pub mod rule_validator;
pub mod wave_sequencer;
mod wave_analysis;

pub use {
    fib_calculator::FibCalculator,
    pivot_extractor::PivotExtractor,
    result_assembler::ResultAssembler,
    rule_validator::{RULES, RuleValidator, Verdict, Violation, WaveRule},
    wave_analysis::analyze_waves,
    wave_sequencer::{SequencerOutput, SequencerState, WaveSequencer},
};
