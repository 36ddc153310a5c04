use crate::domain::Bar;

/// The most recent `max` bars (all of them when `max` is `None` or larger than the input).
pub fn recent_window(bars: &[Bar], max: Option<usize>) -> &[Bar] {
    match max {
        Some(max) if bars.len() > max => &bars[bars.len() - max..],
        _ => bars,
    }
}
