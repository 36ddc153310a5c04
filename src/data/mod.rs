// Bar input: file loading, windowing and synthetic fixtures
pub mod fixtures;
mod loader;
mod window;

pub use {
    loader::{TIMESTAMP_KEYS, load_bars, parse_bars_csv, parse_bars_json, parse_timestamp_ms},
    window::recent_window,
};
