mod analysis_result;
mod fib_target;
mod wave_count;

pub use {
    analysis_result::{AnalysisResult, AnalysisStatus, Trend},
    fib_target::{FibTarget, LevelLabel},
    wave_count::WaveCount,
};
