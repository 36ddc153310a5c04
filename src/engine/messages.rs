use std::sync::Arc;

use crate::config::WaveConfig;
use crate::domain::Bar;
use crate::errors::WaveError;
use crate::models::AnalysisResult;

/// A request to run the wave analysis for one symbol
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub symbol: String,
    pub bars: Arc<Vec<Bar>>,
    pub config: WaveConfig,
}

/// The result returned by the worker
#[derive(Debug, Clone)]
pub struct JobResult {
    pub symbol: String,
    pub duration_ms: u128,

    pub result: Result<Arc<AnalysisResult>, WaveError>,

    /// Bars supplied with the request (before any `max_bars` cap).
    pub bar_count: usize,
}
