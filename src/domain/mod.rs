// Domain types and value objects
mod bar;
mod pivot;
mod wave;

// Re-export commonly used types to the world
pub use bar::{Bar, validate_bars};
pub use pivot::{Pivot, PivotKind};
pub use wave::{Invalidation, Wave, WaveDirection, WaveLabel, WaveRole};
