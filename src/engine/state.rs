use std::sync::Arc;

use crate::errors::WaveError;
use crate::models::AnalysisResult;
use crate::utils::AppInstant;

/// Represents the state of a single symbol in the engine.
#[derive(Debug, Clone)]
pub struct SymbolState {
    /// Latest successful analysis. Replaced wholesale when a new one arrives.
    pub result: Option<Arc<AnalysisResult>>,

    pub last_bar_count: usize,
    pub last_update_time: AppInstant,

    /// Is the worker currently crunching this symbol?
    pub is_calculating: bool,

    /// Last error (if any)
    pub last_error: Option<WaveError>,
}

impl SymbolState {
    pub fn new() -> Self {
        Self {
            result: None,
            last_bar_count: 0,
            last_update_time: AppInstant::now(),
            is_calculating: false,
            last_error: None,
        }
    }

    /// Swaps in a fresh result.
    pub fn update_buffer(&mut self, new_result: Arc<AnalysisResult>, bar_count: usize) {
        self.result = Some(new_result);
        self.last_bar_count = bar_count;
        self.is_calculating = false;
        self.last_update_time = AppInstant::now();
        self.last_error = None;
    }

    /// Records a failure. The stale result is dropped so nobody reads a count for old data.
    pub fn record_failure(&mut self, error: WaveError, bar_count: usize) {
        self.result = None;
        self.last_bar_count = bar_count;
        self.is_calculating = false;
        self.last_error = Some(error);
    }
}

impl Default for SymbolState {
    fn default() -> Self {
        Self::new()
    }
}
