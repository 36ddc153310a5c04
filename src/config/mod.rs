//! Configuration module for the wave engine.

mod analysis;
mod debug;
mod types;

// Public
pub mod constants;

// Re-export commonly used items
pub use analysis::{WAVE_ANALYSIS, WaveConfig};
pub use debug::{DEBUG_FLAGS, LogFlags};
pub use types::PivotPct;
