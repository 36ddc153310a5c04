use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::Duration;

use crate::config::{DEBUG_FLAGS, WAVE_ANALYSIS, WaveConfig};
use crate::domain::Bar;
use crate::errors::WaveError;
use crate::models::AnalysisResult;
use crate::utils::AppInstant;

use super::messages::{JobRequest, JobResult};
use super::state::SymbolState;
use super::worker;

/// Caller-owned task queue in front of a single analysis worker.
///
/// Every job is an independent, stateless call to `analyze_waves`; the engine only keeps the
/// latest bars and the latest result per symbol.
pub struct WaveEngine {
    /// Registry of all symbols
    pub symbols: HashMap<String, SymbolState>,

    /// Latest bar series per symbol. Shared read-only with in-flight jobs.
    series: HashMap<String, Arc<Vec<Bar>>>,

    job_tx: Sender<JobRequest>,
    result_rx: Receiver<JobResult>,

    /// Symbols waiting to be dispatched, front first
    pub queue: VecDeque<String>,

    /// The Live Configuration State
    pub current_config: WaveConfig,
    pub config_overrides: HashMap<String, WaveConfig>,
}

impl WaveEngine {
    /// Creates the channels and spawns the worker thread.
    pub fn new(config: WaveConfig) -> Self {
        let (job_tx, job_rx) = channel::<JobRequest>();
        let (result_tx, result_rx) = channel::<JobResult>();

        worker::spawn_worker_thread(job_rx, result_tx);

        Self {
            symbols: HashMap::new(),
            series: HashMap::new(),
            job_tx,
            result_rx,
            queue: VecDeque::new(),
            current_config: config,
            config_overrides: HashMap::new(),
        }
    }

    /// Registers (or replaces) the bar series for a symbol and queues a recalculation.
    pub fn load_series(&mut self, symbol: &str, bars: Vec<Bar>) {
        self.series.insert(symbol.to_string(), Arc::new(bars));
        self.symbols.entry(symbol.to_string()).or_default();
        self.enqueue(symbol);
    }

    /// Queues a symbol at the back unless it is already waiting.
    pub fn enqueue(&mut self, symbol: &str) {
        if !self.queue.iter().any(|s| s == symbol) {
            self.queue.push_back(symbol.to_string());
        }
    }

    /// Jumps the queue, unless the symbol is being calculated or already waiting.
    pub fn force_recalc(&mut self, symbol: &str) {
        let is_calculating = self
            .symbols
            .get(symbol)
            .map(|s| s.is_calculating)
            .unwrap_or(false);
        let in_queue = self.queue.iter().any(|s| s == symbol);

        if !is_calculating && !in_queue {
            self.queue.push_front(symbol.to_string());
        }
    }

    /// Re-queues every known symbol, optionally putting one first.
    pub fn trigger_global_recalc(&mut self, priority: Option<&str>) {
        self.queue.clear();

        let mut all: Vec<String> = self.get_all_symbols();
        if let Some(vip) = priority {
            all.retain(|s| s != vip);
            if self.series.contains_key(vip) {
                self.queue.push_back(vip.to_string());
            }
        }
        self.queue.extend(all);
    }

    /// Swaps the shared config and requeues every symbol so results follow it.
    /// Symbols with an override keep their own config.
    pub fn update_config(&mut self, new_config: WaveConfig) {
        self.current_config = new_config;
        self.trigger_global_recalc(None);
    }

    pub fn set_config_override(&mut self, symbol: &str, config: WaveConfig) {
        self.config_overrides.insert(symbol.to_string(), config);
    }

    /// One tick: absorb finished jobs, then dispatch the next queued one.
    pub fn update(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_job_result(result);
        }
        self.process_queue();
    }

    /// Ticks until nothing is queued or in flight. Returns false on timeout.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let start = AppInstant::now();

        loop {
            self.update();

            if self.is_idle() {
                return true;
            }

            let remaining = match timeout.checked_sub(start.elapsed()) {
                Some(r) if !r.is_zero() => r,
                _ => return false,
            };

            if self.is_busy() {
                match self.result_rx.recv_timeout(remaining) {
                    Ok(result) => self.handle_job_result(result),
                    Err(RecvTimeoutError::Timeout) => return false,
                    Err(RecvTimeoutError::Disconnected) => {
                        log::error!("Worker thread is gone; {} job(s) lost", self.queue.len());
                        return false;
                    }
                }
            }
        }
    }

    // --- ACCESSORS ---

    pub fn get_result(&self, symbol: &str) -> Option<Arc<AnalysisResult>> {
        self.symbols.get(symbol).and_then(|s| s.result.clone())
    }

    pub fn get_symbol_status(&self, symbol: &str) -> (bool, Option<WaveError>) {
        if let Some(state) = self.symbols.get(symbol) {
            (state.is_calculating, state.last_error.clone())
        } else {
            (false, None)
        }
    }

    pub fn get_bar_count(&self, symbol: &str) -> usize {
        self.symbols
            .get(symbol)
            .map(|s| s.last_bar_count)
            .unwrap_or(0)
    }

    pub fn get_all_symbols(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn get_worker_status_msg(&self) -> Option<String> {
        let calculating = self
            .symbols
            .iter()
            .find(|(_, state)| state.is_calculating)
            .map(|(name, _)| name.clone());

        if let Some(symbol) = calculating {
            Some(format!("Processing {}", symbol))
        } else if !self.queue.is_empty() {
            Some(format!("Queued: {}", self.queue.len()))
        } else {
            None
        }
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && !self.is_busy()
    }

    // --- INTERNAL LOGIC ---

    fn is_busy(&self) -> bool {
        self.symbols.values().any(|s| s.is_calculating)
    }

    fn handle_job_result(&mut self, result: JobResult) {
        let Some(state) = self.symbols.get_mut(&result.symbol) else {
            return;
        };

        match result.result {
            Ok(analysis) => {
                if DEBUG_FLAGS.log_worker {
                    log::info!(
                        "ENGINE: {} -> {} wave(s), trend {} ({}ms)",
                        result.symbol,
                        analysis.waves.len(),
                        analysis.trend,
                        result.duration_ms
                    );
                }
                state.update_buffer(analysis, result.bar_count);
            }
            Err(e) => {
                log::error!("Worker failed for {}: {}", result.symbol, e);
                state.record_failure(e, result.bar_count);
            }
        }
    }

    fn process_queue(&mut self) {
        // Single worker: one job in flight at a time
        if self.is_busy() {
            return;
        }

        while let Some(symbol) = self.queue.pop_front() {
            if self.dispatch_job(symbol) {
                break;
            }
        }
    }

    /// Sends one job. Returns false when the symbol has no series (nothing was sent).
    fn dispatch_job(&mut self, symbol: String) -> bool {
        let Some(bars) = self.series.get(&symbol).cloned() else {
            log::warn!("ENGINE: no series loaded for {}, dropping from queue", symbol);
            return false;
        };

        let config = self
            .config_overrides
            .get(&symbol)
            .or_else(|| self.config_overrides.get(&symbol.to_uppercase()))
            .cloned()
            .unwrap_or_else(|| self.current_config.clone());

        let state = self.symbols.entry(symbol.clone()).or_default();
        state.is_calculating = true;

        let req = JobRequest {
            symbol,
            bars,
            config,
        };

        if let Err(e) = self.job_tx.send(req) {
            log::error!("ENGINE: worker channel closed, could not dispatch {}", e.0.symbol);
            state.is_calculating = false;
            return false;
        }
        true
    }
}

impl Default for WaveEngine {
    fn default() -> Self {
        Self::new(WAVE_ANALYSIS)
    }
}
