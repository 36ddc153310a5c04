/// Relative distance between two prices, measured against the larger magnitude.
pub fn calculate_percent_diff(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 { 0.0 } else { (a - b).abs() / scale }
}

/// True when `a` and `b` are within `tolerance_pct` (a fraction, 0.001 = 0.1%) of each other.
pub fn within_relative_tolerance(a: f64, b: f64, tolerance_pct: f64) -> bool {
    calculate_percent_diff(a, b) <= tolerance_pct
}
