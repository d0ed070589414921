//! Asynchronous translator invocation.
//!
//! [`TranslationRunner::start`] runs the translator on a worker thread and
//! commits its output into a shared [`TranslationSlot`]. Every request is
//! stamped with a [`RequestToken`]; a result is committed only when its token
//! is still the latest one issued, so a slow, superseded request can never
//! overwrite a newer translation. Superseded processes are left to finish on
//! their own and their output is dropped.
//!
//! Each output stream is captured up to a fixed byte limit (4096 by default).
//! Anything beyond it is read and discarded so the child never blocks on a
//! full pipe; long translations are therefore truncated.

use crate::error::TranslationError;
use crate::host::ListHost;
use parking_lot::Mutex;
use rofi_ts_config::Config;
use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Something that turns a query into raw (ANSI-tagged) translation text.
pub trait Translate: Send + Sync {
    /// Translate `query`, blocking until the result is available.
    fn translate(&self, query: &str) -> Result<String, TranslationError>;
}

/// The external translator, invoked as `<argv...> <query>`.
#[derive(Debug, Clone)]
pub struct TransCommand {
    argv: Vec<String>,
    output_limit: usize,
}

impl TransCommand {
    /// Create a translator from a program and its leading arguments.
    pub fn new(argv: Vec<String>, output_limit: usize) -> Result<Self, TranslationError> {
        if argv.is_empty() {
            return Err(TranslationError::InvalidCommand(
                "empty translator command".to_string(),
            ));
        }
        Ok(Self {
            argv,
            output_limit: output_limit.max(1),
        })
    }

    /// Create the translator described by the configuration.
    pub fn from_config(config: &Config) -> Result<Self, TranslationError> {
        let argv = config
            .translator_argv()
            .map_err(|e| TranslationError::InvalidCommand(e.to_string()))?;
        Self::new(argv, config.output_limit)
    }

    fn program(&self) -> &str {
        &self.argv[0]
    }
}

impl Translate for TransCommand {
    /// Result is `stderr + "\n" + stdout`, each truncated to the output limit.
    fn translate(&self, query: &str) -> Result<String, TranslationError> {
        let program = self.program().to_string();
        let mut child = Command::new(&program)
            .args(&self.argv[1..])
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TranslationError::Spawn {
                program: program.clone(),
                source,
            })?;

        let limit = self.output_limit;
        let stderr_thread = child.stderr.take().map(|stderr| {
            std::thread::spawn(move || read_limited(stderr, limit))
        });
        let stdout = match child.stdout.take() {
            Some(stdout) => read_limited(stdout, limit),
            None => Ok(String::new()),
        };
        let stderr = match stderr_thread {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                Err(io::Error::other("stderr reader thread panicked"))
            }),
            None => Ok(String::new()),
        };

        let status = child.wait().map_err(|source| TranslationError::Wait {
            program: program.clone(),
            source,
        })?;
        let stdout = stdout.map_err(|source| TranslationError::Read {
            stream: "stdout",
            source,
        })?;
        let stderr = stderr.map_err(|source| TranslationError::Read {
            stream: "stderr",
            source,
        })?;

        log::debug!("Stdout: {}", stdout);
        log::debug!("Stderr: {}", stderr);

        if !status.success() {
            return Err(TranslationError::Exit {
                program,
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(format!("{stderr}\n{stdout}"))
    }
}

/// Read at most `limit` bytes, then drain the rest of the stream.
fn read_limited<R: Read>(mut reader: R, limit: usize) -> io::Result<String> {
    let mut buf = Vec::with_capacity(limit.min(64 * 1024));
    reader.by_ref().take(limit as u64).read_to_end(&mut buf)?;
    let discarded = io::copy(&mut reader, &mut io::sink())?;
    if discarded > 0 {
        log::warn!("Translator output truncated, {} bytes discarded", discarded);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Identifies one translation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// What the slot currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Nothing translated yet; the text is the placeholder message.
    Placeholder(String),
    /// Raw translator output.
    Ready(String),
    /// The last request failed; the text describes the failure.
    Failed(String),
}

impl Translation {
    /// Text to render, whichever state the slot is in.
    pub fn raw(&self) -> &str {
        match self {
            Translation::Placeholder(text)
            | Translation::Ready(text)
            | Translation::Failed(text) => text,
        }
    }

    /// Whether the last request failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Translation::Failed(_))
    }
}

#[derive(Debug)]
struct SlotState {
    generation: u64,
    /// Generation of the stored translation.
    committed: u64,
    translation: Translation,
}

/// Single-value store for the latest translation, shared with worker threads.
#[derive(Debug)]
pub struct TranslationSlot {
    state: Mutex<SlotState>,
}

impl TranslationSlot {
    /// Create a slot holding the placeholder message.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(SlotState {
                generation: 0,
                committed: 0,
                translation: Translation::Placeholder(placeholder.into()),
            }),
        }
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&self) -> RequestToken {
        let mut state = self.state.lock();
        state.generation += 1;
        RequestToken(state.generation)
    }

    /// Whether `token` is the latest issued token.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.state.lock().generation == token.0
    }

    /// Replace the stored translation if `token` is still current.
    ///
    /// Returns `false` (and drops `translation`) for superseded tokens.
    pub fn commit(&self, token: RequestToken, translation: Translation) -> bool {
        let mut state = self.state.lock();
        if state.generation != token.0 {
            return false;
        }
        state.committed = token.0;
        state.translation = translation;
        true
    }

    /// Whether the latest issued request has not committed yet.
    pub fn is_pending(&self) -> bool {
        let state = self.state.lock();
        state.committed != state.generation
    }

    /// Snapshot of the stored translation.
    pub fn get(&self) -> Translation {
        self.state.lock().translation.clone()
    }
}

/// Handle of a started request.
///
/// Dropping it detaches the worker thread.
#[derive(Debug)]
pub struct RequestHandle {
    token: RequestToken,
    thread: Option<JoinHandle<()>>,
}

impl RequestHandle {
    /// Token the request was issued with.
    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// Block until the worker thread has committed or discarded its result.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::error!("Translation thread panicked");
        }
    }
}

/// Starts translations and delivers their results to the slot.
pub struct TranslationRunner {
    translator: Arc<dyn Translate>,
    slot: Arc<TranslationSlot>,
    host: Arc<dyn ListHost>,
}

impl TranslationRunner {
    pub fn new(
        translator: Arc<dyn Translate>,
        slot: Arc<TranslationSlot>,
        host: Arc<dyn ListHost>,
    ) -> Self {
        Self {
            translator,
            slot,
            host,
        }
    }

    /// Start translating `query` in the background.
    ///
    /// When the result is committed the host is asked to redraw. Results of
    /// superseded requests are discarded without a redraw.
    pub fn start(&self, query: &str) -> RequestHandle {
        let token = self.slot.issue();
        log::debug!("Starting translation {:?} for {:?}", token, query);

        let translator = Arc::clone(&self.translator);
        let slot = Arc::clone(&self.slot);
        let host = Arc::clone(&self.host);
        let query = query.to_string();

        let spawned = std::thread::Builder::new()
            .name("ts-translate".into())
            .spawn(move || {
                let translation = run_request(translator.as_ref(), &query);
                deliver(&slot, host.as_ref(), token, translation);
            });

        match spawned {
            Ok(thread) => RequestHandle {
                token,
                thread: Some(thread),
            },
            Err(e) => {
                log::error!("Failed to spawn translation thread: {}", e);
                let failed = Translation::Failed(format!("Failed to start translation: {e}"));
                deliver(&self.slot, self.host.as_ref(), token, failed);
                RequestHandle {
                    token,
                    thread: None,
                }
            }
        }
    }

    /// Shared slot the runner commits into.
    pub fn slot(&self) -> &Arc<TranslationSlot> {
        &self.slot
    }
}

fn run_request(translator: &dyn Translate, query: &str) -> Translation {
    match translator.translate(query) {
        Ok(text) => {
            log::debug!("Translation: {}", text);
            Translation::Ready(text)
        }
        Err(e) => {
            log::error!("Translation of {:?} failed: {}", query, e);
            Translation::Failed(e.to_string())
        }
    }
}

fn deliver(slot: &TranslationSlot, host: &dyn ListHost, token: RequestToken, translation: Translation) {
    if slot.commit(token, translation) {
        host.request_reload();
    } else {
        log::debug!("Discarding stale translation {:?}", token);
    }
}
