//! Typed error variants for the rofi-ts-config crate.
//!
//! Callers at the crate boundary can match on specific failure modes instead
//! of opaque strings; the binary wraps them in `anyhow`.

use thiserror::Error;

/// Errors that can occur when loading configuration or applying host options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("Config validation error: {0}")]
    Validation(String),
}
