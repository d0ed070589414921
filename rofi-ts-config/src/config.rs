//! The `Config` struct, its YAML persistence and host-option overrides.
//!
//! Covers:
//! - `load` / `load_from` (YAML file I/O; a missing file yields defaults)
//! - XDG-style path helpers (`config_path`, `default_history_path`)
//! - `apply_host_args` for the `-ts-*` options the launcher passes through

use crate::error::ConfigError;
use crate::types::{LogLevel, MatchingMethod};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Host option carrying the copy command template.
pub const OPT_COMMAND: &str = "-ts-command";
/// Host option overriding the translator command line.
pub const OPT_TRANSLATOR: &str = "-ts-translator";
/// Host option overriding the history file location.
pub const OPT_HISTORY: &str = "-ts-history";
/// Host option overriding the history capacity.
pub const OPT_MAX_HISTORY: &str = "-ts-max-history";

/// Placeholder replaced with the record text in the command template.
pub const RESULT_PLACEHOLDER: &str = "{result}";

/// Directory (under the user data dir) holding the history file.
pub const HISTORY_SUBDIR: &str = "rofi";
/// File name of the history log.
pub const HISTORY_FILE_NAME: &str = "rofi_ts_history";

/// Plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Shell command template run by the copy and history actions.
    ///
    /// `{result}` is replaced with the record text. `None` disables both actions.
    #[serde(default)]
    pub command: Option<String>,

    /// Translator command line; the query is appended as the last argument.
    #[serde(default = "crate::defaults::translator")]
    pub translator: String,

    /// Maximum number of records kept in the history file
    #[serde(default = "crate::defaults::max_history")]
    pub max_history: usize,

    /// Override of the history file location (`~/` is expanded)
    #[serde(default)]
    pub history_path: Option<PathBuf>,

    /// Bytes captured from each translator output stream
    #[serde(default = "crate::defaults::output_limit")]
    pub output_limit: usize,

    /// Matching method used for history rows
    #[serde(default)]
    pub matching: MatchingMethod,

    /// Whether history matching is case-sensitive
    #[serde(default = "crate::defaults::bool_false")]
    pub case_sensitive: bool,

    /// Message shown before the first translation arrives
    #[serde(default = "crate::defaults::placeholder")]
    pub placeholder: String,

    /// Debug log verbosity
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            translator: crate::defaults::translator(),
            max_history: crate::defaults::max_history(),
            history_path: None,
            output_limit: crate::defaults::output_limit(),
            matching: MatchingMethod::default(),
            case_sensitive: crate::defaults::bool_false(),
            placeholder: crate::defaults::placeholder(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, or defaults if it is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    ///
    /// The file is never created implicitly.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        let config: Config = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            home_dir
                .join(".config")
                .join("rofi-ts")
                .join("config.yaml")
        } else {
            // Fallback if home directory cannot be determined
            PathBuf::from("config.yaml")
        }
    }

    /// Default history location: `<user-data-dir>/rofi/rofi_ts_history`.
    pub fn default_history_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HISTORY_SUBDIR)
            .join(HISTORY_FILE_NAME)
    }

    /// Effective history path, honouring the override.
    pub fn history_path(&self) -> PathBuf {
        match &self.history_path {
            Some(path) => expand_home(path),
            None => Self::default_history_path(),
        }
    }

    /// Split the translator command line into program and arguments.
    pub fn translator_argv(&self) -> Result<Vec<String>, ConfigError> {
        let argv = shell_words::split(&self.translator).map_err(|e| {
            ConfigError::Validation(format!("translator '{}': {}", self.translator, e))
        })?;
        if argv.is_empty() {
            return Err(ConfigError::Validation(
                "translator must not be empty".to_string(),
            ));
        }
        Ok(argv)
    }

    /// Apply the `-ts-*` options found in the host's argument vector.
    ///
    /// Lookup follows the launcher's convention: option names compare
    /// case-insensitively, the first occurrence wins, and the value is the
    /// following argument.
    pub fn apply_host_args<S: AsRef<str>>(&mut self, args: &[S]) -> Result<(), ConfigError> {
        if let Some(command) = find_arg_str(args, OPT_COMMAND) {
            self.command = Some(command.to_string());
        }
        if let Some(translator) = find_arg_str(args, OPT_TRANSLATOR) {
            self.translator = translator.to_string();
        }
        if let Some(path) = find_arg_str(args, OPT_HISTORY) {
            self.history_path = Some(PathBuf::from(path));
        }
        if let Some(max) = find_arg_str(args, OPT_MAX_HISTORY) {
            self.max_history = max.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{OPT_MAX_HISTORY} expects a number, got '{max}'"))
            })?;
        }
        self.validate()
    }

    /// Check field values that would break the plugin at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::Validation(
                "max_history must be at least 1".to_string(),
            ));
        }
        if self.output_limit == 0 {
            return Err(ConfigError::Validation(
                "output_limit must be at least 1".to_string(),
            ));
        }
        self.translator_argv().map(|_| ())
    }
}

/// Value following `key` in `args`, if present.
fn find_arg_str<'a, S: AsRef<str>>(args: &'a [S], key: &str) -> Option<&'a str> {
    let index = args
        .iter()
        .position(|arg| arg.as_ref().eq_ignore_ascii_case(key))?;
    args.get(index + 1).map(AsRef::as_ref)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.command, None);
        assert_eq!(config.translator, "trans");
        assert_eq!(config.max_history, 1000);
        assert_eq!(config.output_limit, 4096);
        assert_eq!(config.placeholder, "type to trans");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_history_path_layout() {
        let path = Config::default_history_path();
        assert!(path.ends_with("rofi/rofi_ts_history"));
    }

    #[test]
    fn test_host_args_override() {
        let mut config = Config::default();
        config
            .apply_host_args(&args(&[
                "rofi",
                "-show",
                "ts",
                "-TS-COMMAND",
                "echo '{result}' | xclip",
                "-ts-max-history",
                "50",
            ]))
            .unwrap();
        assert_eq!(config.command.as_deref(), Some("echo '{result}' | xclip"));
        assert_eq!(config.max_history, 50);
    }

    #[test]
    fn test_host_args_first_occurrence_wins() {
        let mut config = Config::default();
        config
            .apply_host_args(&args(&["-ts-command", "first", "-ts-command", "second"]))
            .unwrap();
        assert_eq!(config.command.as_deref(), Some("first"));
    }

    #[test]
    fn test_host_arg_without_value_is_ignored() {
        let mut config = Config::default();
        config.apply_host_args(&args(&["-ts-command"])).unwrap();
        assert_eq!(config.command, None);
    }

    #[test]
    fn test_invalid_max_history_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_host_args(&args(&["-ts-max-history", "lots"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let mut config = Config::default();
        assert!(
            config
                .apply_host_args(&args(&["-ts-max-history", "0"]))
                .is_err()
        );
    }

    #[test]
    fn test_translator_argv_splits_words() {
        let config = Config {
            translator: "trans -b ':de'".to_string(),
            ..Config::default()
        };
        assert_eq!(config.translator_argv().unwrap(), vec!["trans", "-b", ":de"]);

        let empty = Config {
            translator: "   ".to_string(),
            ..Config::default()
        };
        assert!(empty.translator_argv().is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "command: \"printf %s '{result}' | wl-copy\"\nmatching: fuzzy\nmax_history: 10\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.command.as_deref(),
            Some("printf %s '{result}' | wl-copy")
        );
        assert_eq!(config.matching, MatchingMethod::Fuzzy);
        assert_eq!(config.max_history, 10);
        assert_eq!(config.translator, "trans");
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_history: [not, a, number]\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_history_path_override() {
        let config = Config {
            history_path: Some(PathBuf::from("/tmp/ts_history")),
            ..Config::default()
        };
        assert_eq!(config.history_path(), PathBuf::from("/tmp/ts_history"));
    }
}
