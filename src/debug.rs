//! File-backed logging for rofi-ts
//!
//! The plugin runs inside the launcher, so nothing may be written to its
//! stdout/stderr. All `log::*!` output goes to /tmp/rofi_ts_debug.log
//! instead (or %TEMP%\rofi_ts_debug.log on Windows).
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then
//! `DEBUG_LEVEL` (0 = off .. 4 = trace), then the config file.

use parking_lot::Mutex;
use rofi_ts_config::LogLevel;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Pick the effective level from the flag, environment and config.
pub fn resolve_level(
    cli: Option<LogLevel>,
    rust_log: Option<&str>,
    debug_level: Option<&str>,
    config: LogLevel,
) -> LogLevel {
    cli.or_else(|| rust_log.and_then(LogLevel::from_name))
        .or_else(|| {
            debug_level
                .and_then(|value| value.trim().parse::<u8>().ok())
                .map(LogLevel::from_number)
        })
        .unwrap_or(config)
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/rofi_ts_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("rofi_ts_debug.log")
    }
}

struct FileLogger {
    file: Mutex<File>,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        let mut file = self.file.lock();
        let _ = file.write_all(line.as_bytes());
        let _ = file.flush();
    }

    fn flush(&self) {
        let _ = self.file.lock().flush();
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Route the `log` facade to the debug file at `level`.
///
/// `LogLevel::Off` installs nothing. Failing to open the file silently
/// disables logging rather than disturbing the launcher.
pub fn init_log_bridge(level: LogLevel) {
    if level == LogLevel::Off {
        return;
    }
    let path = log_path();
    let file = match OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(_) => return,
    };

    let logger = LOGGER.get_or_init(|| FileLogger {
        file: Mutex::new(file),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level.to_level_filter());
        log::info!(
            "rofi-ts debug session started at {} (level={:?})",
            get_timestamp(),
            level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flag_wins() {
        let level = resolve_level(Some(LogLevel::Warn), Some("trace"), Some("4"), LogLevel::Off);
        assert_eq!(level, LogLevel::Warn);
    }

    #[test]
    fn test_rust_log_before_debug_level() {
        let level = resolve_level(None, Some("debug"), Some("1"), LogLevel::Off);
        assert_eq!(level, LogLevel::Debug);
    }

    #[test]
    fn test_debug_level_number() {
        let level = resolve_level(None, Some("bogus"), Some("2"), LogLevel::Off);
        assert_eq!(level, LogLevel::Info);
    }

    #[test]
    fn test_falls_back_to_config() {
        assert_eq!(resolve_level(None, None, None, LogLevel::Error), LogLevel::Error);
        assert_eq!(resolve_level(None, None, Some("x"), LogLevel::Trace), LogLevel::Trace);
    }
}
