//! Shared integration test helpers for rofi-ts.
//!
//! Sessions built here never start a real translator or shell: translation
//! goes through [`CannedTranslator`] and commands are captured by
//! [`RecordingLauncher`]. History files live in a [`TempDir`] that must
//! outlive the session.
//!
//! ```ignore
//! mod common;
//! use common::{TestContext, CannedTranslator};
//! ```

#![allow(dead_code)]

use parking_lot::Mutex;
use rofi_ts::command::Launcher;
use rofi_ts::error::{CommandError, TranslationError};
use rofi_ts::history::History;
use rofi_ts::host::ListHost;
use rofi_ts::session::Session;
use rofi_ts::translation::Translate;
use rofi_ts_config::Config;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use tempfile::TempDir;

/// Query that makes [`CannedTranslator`] fail.
pub const FAILING_QUERY: &str = "fail";

/// Returns fixed stdout text per query; unknown queries echo back.
#[derive(Default)]
pub struct CannedTranslator {
    replies: HashMap<String, String>,
    calls: AtomicUsize,
}

impl CannedTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `stdout` (stderr is always empty).
    pub fn reply(mut self, query: &str, stdout: &str) -> Self {
        self.replies.insert(query.to_string(), stdout.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Translate for CannedTranslator {
    fn translate(&self, query: &str) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query == FAILING_QUERY {
            return Err(TranslationError::Exit {
                program: "trans".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "no network".to_string(),
            });
        }
        let stdout = self
            .replies
            .get(query)
            .cloned()
            .unwrap_or_else(|| format!("{query}\n"));
        Ok(format!("\n{stdout}"))
    }
}

/// Holds every query until [`GatedTranslator::release`] is called, then
/// answers like [`CannedTranslator`].
pub struct GatedTranslator {
    inner: CannedTranslator,
    gate: Mutex<mpsc::Receiver<()>>,
}

impl GatedTranslator {
    /// The translator plus the sender that opens its gate once per query.
    pub fn new(inner: CannedTranslator) -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let translator = Self {
            inner,
            gate: Mutex::new(rx),
        };
        (translator, tx)
    }
}

impl Translate for GatedTranslator {
    fn translate(&self, query: &str) -> Result<String, TranslationError> {
        let _ = self.gate.lock().recv();
        self.inner.translate(query)
    }
}

/// Captures launched records instead of running them.
#[derive(Default)]
pub struct RecordingLauncher {
    launched: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher whose every launch fails to spawn.
    pub fn failing() -> Self {
        Self {
            launched: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, record: &str) -> Result<(), CommandError> {
        if self.fail {
            return Err(CommandError::Spawn {
                command: record.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no /bin/sh"),
            });
        }
        self.launched.lock().push(record.to_string());
        Ok(())
    }
}

/// Counts redraw requests.
#[derive(Default)]
pub struct CountingHost {
    reloads: AtomicUsize,
}

impl CountingHost {
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl ListHost for CountingHost {
    fn request_reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// A temp dir holding the history file plus the fakes wired into sessions.
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config: Config,
    pub translator: Arc<CannedTranslator>,
    pub launcher: Arc<RecordingLauncher>,
    pub host: Arc<CountingHost>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_translator(CannedTranslator::new())
    }

    pub fn with_translator(translator: CannedTranslator) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config {
            history_path: Some(temp_dir.path().join("rofi").join("rofi_ts_history")),
            ..Config::default()
        };
        Self {
            temp_dir,
            config,
            translator: Arc::new(translator),
            launcher: Arc::new(RecordingLauncher::new()),
            host: Arc::new(CountingHost::default()),
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.config.history_path()
    }

    /// Write `records` (oldest first) to the history file.
    pub fn seed_history(&self, records: &[&str]) {
        let path = self.history_path();
        fs::create_dir_all(path.parent().expect("history path has a parent"))
            .expect("Failed to create history dir");
        fs::write(&path, records.join("\n")).expect("Failed to seed history");
    }

    /// Write raw bytes to the history file.
    pub fn seed_history_bytes(&self, bytes: &[u8]) {
        let path = self.history_path();
        fs::create_dir_all(path.parent().expect("history path has a parent"))
            .expect("Failed to create history dir");
        fs::write(&path, bytes).expect("Failed to seed history");
    }

    /// Raw contents of the history file.
    pub fn history_file(&self) -> String {
        fs::read_to_string(self.history_path()).unwrap_or_default()
    }

    /// Open a session the way the plugin does, with the real translator and
    /// command runner.
    pub fn open_session(&self) -> Session {
        Session::open(&self.config, self.host.clone()).expect("Failed to open session")
    }

    /// Open a session over the history file using the fakes.
    pub fn session(&self) -> Session {
        let history = History::load(self.history_path(), self.config.max_history)
            .expect("Failed to load history");
        Session::new(
            &self.config,
            history,
            self.translator.clone(),
            self.launcher.clone(),
            self.host.clone(),
        )
    }
}

/// Feed `input` to the session and wait for its translation to land.
pub fn type_and_wait(session: &mut Session, input: &str) {
    if let Some(request) = session.input_changed(input) {
        request.join();
    }
}
