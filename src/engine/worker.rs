use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use rayon::prelude::*;

use super::messages::{JobRequest, JobResult};

use crate::analysis::analyze_waves;
use crate::config::DEBUG_FLAGS;
use crate::utils::AppInstant;

/// Spawns a background thread that processes jobs until the request channel closes.
pub fn spawn_worker_thread(rx: Receiver<JobRequest>, tx: Sender<JobResult>) {
    thread::spawn(move || {
        while let Ok(req) = rx.recv() {
            process_request_sync(req, tx.clone());
        }

        if DEBUG_FLAGS.log_worker {
            log::info!("Worker: request channel closed, exiting");
        }
    });
}

pub fn process_request_sync(req: JobRequest, tx: Sender<JobResult>) {
    let response = run_job(&req);
    // The engine may already be gone; nothing left to report to.
    let _ = tx.send(response);
}

/// One stateless engine invocation.
pub fn run_job(req: &JobRequest) -> JobResult {
    let label = format!("{} @ {}", req.symbol, req.config.pivot_threshold);

    crate::trace_time!(&format!("Total JOB [{}]", label), 5000, {
        let start = AppInstant::now();

        if DEBUG_FLAGS.log_worker {
            log::info!("Worker: start [{}] ({} bars)", label, req.bars.len());
        }

        let result = analyze_waves(&req.bars, &req.config).map(Arc::new);
        let elapsed = start.elapsed().as_millis();

        if let Err(e) = &result {
            log::warn!("Analysis failed for {}: {}", req.symbol, e);
        } else if DEBUG_FLAGS.log_worker {
            log::info!("Worker: done [{}] in {}ms", label, elapsed);
        }

        JobResult {
            symbol: req.symbol.clone(),
            duration_ms: elapsed,
            result,
            bar_count: req.bars.len(),
        }
    })
}

/// Runs a batch of independent symbols in parallel, one engine invocation per symbol.
/// Output order matches input order.
pub fn analyze_many(requests: &[JobRequest]) -> Vec<JobResult> {
    requests.par_iter().map(run_job).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WaveConfig;
    use crate::data::fixtures;
    use std::sync::mpsc::channel;

    fn request(symbol: &str, bars: Vec<crate::domain::Bar>) -> JobRequest {
        JobRequest {
            symbol: symbol.to_string(),
            bars: Arc::new(bars),
            config: WaveConfig::default(),
        }
    }

    #[test]
    fn test_process_request_sends_result() {
        let (tx, rx) = channel();
        process_request_sync(request("BTCUSDT", fixtures::impulse_then_correction()), tx);

        let res = rx.recv().unwrap();
        assert_eq!(res.symbol, "BTCUSDT");
        assert!(res.result.is_ok());
        assert!(res.bar_count >= 50);
    }

    #[test]
    fn test_errors_are_reported_not_panicked() {
        let (tx, rx) = channel();
        process_request_sync(request("TINY", fixtures::monotonic_ramp(5, 100.0, 1.0)), tx);
        let res = rx.recv().unwrap();
        assert!(matches!(
            res.result,
            Err(crate::errors::WaveError::InsufficientData { found: 5, .. })
        ));
    }

    #[test]
    fn test_analyze_many_keeps_order() {
        let reqs = vec![
            request("A", fixtures::impulse_then_correction()),
            request("B", fixtures::monotonic_ramp(60, 100.0, 1.0)),
            request("C", fixtures::monotonic_ramp(3, 100.0, 1.0)),
        ];
        let results = analyze_many(&reqs);
        let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "B", "C"]);
        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_ok());
        assert!(results[2].result.is_err());
    }
}
