//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields and by `impl Default for Config`.

/// Maximum number of history records kept on disk.
pub const MAX_HISTORY: usize = 1000;

/// Bytes captured from each of the translator's output streams.
pub const OUTPUT_LIMIT: usize = 4096;

pub fn translator() -> String {
    "trans".to_string()
}

pub fn max_history() -> usize {
    MAX_HISTORY
}

pub fn output_limit() -> usize {
    OUTPUT_LIMIT
}

pub fn placeholder() -> String {
    "type to trans".to_string()
}

pub fn bool_false() -> bool {
    false
}
