mod core;
mod messages;
mod state;
mod worker;

pub use self::core::WaveEngine;
pub use messages::{JobRequest, JobResult};
pub use state::SymbolState;
pub use worker::{analyze_many, process_request_sync, run_job, spawn_worker_thread};
