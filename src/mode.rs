//! Adapter between the launcher's mode callbacks and a [`Session`].
//!
//! The launcher drives a mode through a fixed set of hooks (init, entry
//! count, display value, token match, result, message, input preprocessing,
//! destroy). [`TsMode`] owns the session for the lifetime of one enablement
//! and maps each hook onto it.

use crate::host::{EntryState, ListHost, MenuResult, ModeMode};
use crate::matching::Tokens;
use crate::session::{Outcome, Session};
use rofi_ts_config::{Config, MatchingMethod};
use std::sync::Arc;

/// The translation mode.
pub struct TsMode {
    host: Arc<dyn ListHost>,
    session: Option<Session>,
    matching: MatchingMethod,
    case_sensitive: bool,
}

impl TsMode {
    /// Mode name as typed in `-modi`.
    pub const NAME: &'static str = "ts";
    /// Config key for the mode's display name.
    pub const CFG_NAME_KEY: &'static str = "display-ts";

    pub fn new(host: Arc<dyn ListHost>) -> Self {
        Self {
            host,
            session: None,
            matching: MatchingMethod::default(),
            case_sensitive: false,
        }
    }

    /// Called once when the mode is enabled.
    ///
    /// Loads the config file, applies the host's `-ts-*` options and opens
    /// the session. Calling it again on an initialised mode is a no-op.
    pub fn init<S: AsRef<str>>(&mut self, args: &[S]) -> bool {
        if self.session.is_some() {
            return true;
        }
        let config = Config::load().and_then(|mut config| {
            config.apply_host_args(args)?;
            Ok(config)
        });
        match config {
            Ok(config) => self.init_with(&config),
            Err(e) => {
                log::error!("Loading configuration failed: {}", e);
                false
            }
        }
    }

    /// Initialise from an already resolved configuration.
    pub fn init_with(&mut self, config: &Config) -> bool {
        if self.session.is_some() {
            return true;
        }
        match Session::open(config, Arc::clone(&self.host)) {
            Ok(session) => {
                self.attach(session, config);
                true
            }
            Err(e) => {
                log::error!("Opening session failed: {}", e);
                false
            }
        }
    }

    /// Install a prepared session.
    pub fn attach(&mut self, session: Session, config: &Config) {
        self.matching = config.matching;
        self.case_sensitive = config.case_sensitive;
        self.session = Some(session);
    }

    /// Called when the mode is torn down. History is already on disk.
    pub fn destroy(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Session destroyed");
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn num_entries(&self) -> usize {
        self.session.as_ref().map_or(0, Session::num_entries)
    }

    /// Handle a selection reported as `mretv` bits on `selected_line`.
    pub fn result(&mut self, mretv: u32, selected_line: usize) -> ModeMode {
        let action = MenuResult::from_bits(mretv);
        match action {
            MenuResult::Next => return ModeMode::NextDialog,
            MenuResult::Previous => return ModeMode::PreviousDialog,
            MenuResult::QuickSwitch(mode) => return ModeMode::Switch(mode),
            MenuResult::Other => return ModeMode::Exit,
            MenuResult::Accept | MenuResult::Delete => {}
        }

        let Some(session) = self.session.as_mut() else {
            return ModeMode::Exit;
        };
        let outcome = if action == MenuResult::Accept {
            session.select(selected_line)
        } else {
            session.delete(selected_line)
        };
        match outcome {
            Outcome::Reload => ModeMode::ReloadDialog,
            Outcome::Exit => ModeMode::Exit,
        }
    }

    /// Tokenize filter text the way this mode's matching is configured.
    pub fn tokenize(&self, input: &str) -> Tokens {
        Tokens::parse(input, self.matching, self.case_sensitive)
    }

    pub fn token_match(&self, tokens: &Tokens, index: usize) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.token_match(tokens, index))
    }

    /// Display text for `selected_line`; every row is flagged as markup.
    pub fn display_value(
        &self,
        selected_line: usize,
        state: &mut EntryState,
        get_entry: bool,
    ) -> Option<String> {
        state.insert(EntryState::MARKUP);
        if !get_entry {
            return None;
        }
        self.session.as_ref()?.display_value(selected_line)
    }

    pub fn message(&self) -> Option<String> {
        self.session.as_ref().map(Session::message)
    }

    /// Called with the raw input before every redraw. Returns the text to
    /// filter on, which is the input itself; translation runs in the
    /// background.
    pub fn preprocess_input(&mut self, input: &str) -> String {
        if let Some(session) = self.session.as_mut()
            && let Some(request) = session.input_changed(input)
        {
            // Detached: the worker asks the host to redraw when it commits
            log::trace!("Translation {:?} running", request.token());
            drop(request);
        }
        input.to_string()
    }
}
