//! Configuration system for the rofi-ts translation mode.
//!
//! This crate provides configuration loading, host-argument overrides and
//! default values for the plugin. It includes:
//!
//! - The [`Config`] struct and its YAML persistence
//! - Host option parsing (`-ts-command` and friends)
//! - Path helpers for the config file and the history file

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::{
    Config, HISTORY_FILE_NAME, HISTORY_SUBDIR, OPT_COMMAND, OPT_HISTORY, OPT_MAX_HISTORY,
    OPT_TRANSLATOR, RESULT_PLACEHOLDER,
};
pub use error::ConfigError;
pub use types::{LogLevel, MatchingMethod};
