/// Runs `$block` and reports it when it overruns `$budget_micros`.
///
/// With `DEBUG_FLAGS.log_performance` off this is just the block.
#[macro_export]
macro_rules! trace_time {
    ($label:expr, $budget_micros:expr, $block:block) => {{
        if $crate::config::DEBUG_FLAGS.log_performance {
            let timer = $crate::utils::AppInstant::now();
            let out = $block;
            let elapsed = timer.elapsed();
            if elapsed.as_micros() > $budget_micros {
                log::error!(
                    "Over budget: {} ran {:.3}ms, budget {:.3}ms{}",
                    $label,
                    elapsed.as_secs_f64() * 1000.0,
                    $budget_micros as f64 / 1000.0,
                    if cfg!(debug_assertions) { " (debug build)" } else { "" }
                );
            }
            out
        } else {
            $block
        }
    }};
}
