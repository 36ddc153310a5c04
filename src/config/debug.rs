//! Debugging feature flags.

pub struct LogFlags {
    /// Log every confirmed pivot from the zigzag pass.
    pub log_pivots: bool,

    /// Log sequencer state transitions and restarts.
    pub log_sequencer: bool,

    /// Log each validator verdict (noisy: one per consumed pivot).
    pub log_validator: bool,

    pub log_fib: bool,

    /// Job queue / worker thread activity
    pub log_worker: bool,

    /// Activate trace_time macro (for cool scope-level timing)
    pub log_performance: bool,
}

pub const DEBUG_FLAGS: LogFlags = LogFlags {
    log_sequencer: true,

    log_pivots: false,
    log_validator: false,
    log_fib: false,
    log_worker: false,
    log_performance: false,
};
