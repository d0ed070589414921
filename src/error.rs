//! Typed error types for rofi-ts.
//!
//! Persistence and subprocess failures are values the session can show to
//! the user; nothing in the plugin aborts the launcher.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing the history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The history file exists but could not be read.
    #[error("Reading history '{}' failed: {source}", path.display())]
    Read {
        /// History file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The history file (or its parent directory) could not be written.
    #[error("Writing history '{}' failed: {source}", path.display())]
    Write {
        /// History file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be loaded, so changes are kept in memory only.
    #[error("History '{}' could not be loaded; changes are not saved", path.display())]
    ReadOnly {
        /// History file path.
        path: PathBuf,
    },

    /// A removal addressed a record that does not exist.
    #[error("History index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of records at the time of the call.
        len: usize,
    },
}

/// Failures running the translator subprocess.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The translator command line could not be resolved.
    #[error("Invalid translator command: {0}")]
    InvalidCommand(String),

    /// The process could not be started.
    #[error("Spawning '{program}' failed: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the process failed.
    #[error("Waiting for '{program}' failed: {source}")]
    Wait {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading one of the output pipes failed.
    #[error("Reading {stream} failed: {source}")]
    Read {
        /// `"stdout"` or `"stderr"`.
        stream: &'static str,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Exit {
        /// Program name.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured (possibly truncated) stderr.
        stderr: String,
    },
}

/// Failures launching the user's copy command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// `/bin/sh` could not be started.
    #[error("Running command '{command}' failed: {source}")]
    Spawn {
        /// Command line after placeholder substitution.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
