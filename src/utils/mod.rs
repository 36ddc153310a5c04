mod maths_utils;
mod perf;
mod time_utils;

pub use maths_utils::{calculate_percent_diff, within_relative_tolerance};
pub use time_utils::{
    AppInstant, TimeUtils, dominant_interval_ms, epoch_ms_to_utc,
};
