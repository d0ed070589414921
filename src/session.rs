//! Session state and the list model shown by the launcher.
//!
//! The list always starts with two action rows followed by the history,
//! newest record first:
//!
//! ```text
//! row 0        "detailed" / "brief"   toggle the message view
//! row 1        "copy"                 run the command on the current result
//! row 2        history[len - 1]       newest record
//! ...
//! row len + 1  history[0]             oldest record
//! ```
//!
//! Failures (history I/O, translator, command) never end the session; they
//! are logged and shown above the message until the input changes.

use crate::command::{Launcher, ShellCommand};
use crate::error::TranslationError;
use crate::history::{History, format_record};
use crate::host::ListHost;
use crate::markup;
use crate::matching::TokenMatcher;
use crate::translation::{
    RequestHandle, TransCommand, Translate, Translation, TranslationRunner, TranslationSlot,
};
use rofi_ts_config::Config;
use std::sync::Arc;

/// Row of the toggle action.
pub const TOGGLE_ROW: usize = 0;
/// Row of the copy action.
pub const COPY_ROW: usize = 1;
/// First row showing a history record.
pub const FIRST_HISTORY_ROW: usize = 2;

/// Label of the toggle row while the brief view is shown.
pub const LABEL_DETAILED: &str = "detailed";
/// Label of the toggle row while the detailed view is shown.
pub const LABEL_BRIEF: &str = "brief";
/// Label of the copy row.
pub const LABEL_COPY: &str = "copy";

/// Map a displayed row to a history index (oldest first).
///
/// Row 2 is the newest record (`len - 1`), row `len + 1` the oldest (`0`).
/// Action rows and rows past the end map to `None`.
pub fn row_to_history_index(row: usize, len: usize) -> Option<usize> {
    if row < FIRST_HISTORY_ROW || row > len + 1 {
        return None;
    }
    Some(len + 1 - row)
}

/// Inverse of [`row_to_history_index`].
pub fn history_index_to_row(index: usize, len: usize) -> Option<usize> {
    if index >= len {
        return None;
    }
    Some(len + 1 - index)
}

/// What a displayed row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Toggle,
    Copy,
    /// History record at this index (oldest first).
    History(usize),
}

/// Whether the launcher should stay open after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reload,
    Exit,
}

/// One plugin instance's state.
pub struct Session {
    runner: TranslationRunner,
    launcher: Arc<dyn Launcher>,
    history: History,
    last_input: String,
    detailed: bool,
    notice: Option<String>,
}

impl Session {
    /// Build a session from its collaborators.
    pub fn new(
        config: &Config,
        history: History,
        translator: Arc<dyn Translate>,
        launcher: Arc<dyn Launcher>,
        host: Arc<dyn ListHost>,
    ) -> Self {
        let slot = Arc::new(TranslationSlot::new(config.placeholder.clone()));
        Self {
            runner: TranslationRunner::new(translator, slot, host),
            launcher,
            history,
            last_input: String::new(),
            detailed: false,
            notice: None,
        }
    }

    /// Build the production session: history from disk, the configured
    /// translator and `/bin/sh` command runner.
    ///
    /// An unreadable history file starts the session with an empty history
    /// and a notice instead of failing.
    pub fn open(config: &Config, host: Arc<dyn ListHost>) -> Result<Self, TranslationError> {
        let translator = TransCommand::from_config(config)?;
        let path = config.history_path();
        let (history, notice) = match History::load(path.clone(), config.max_history) {
            Ok(history) => (history, None),
            Err(e) => {
                log::error!("{}", e);
                (
                    History::read_only(path, config.max_history),
                    Some(e.to_string()),
                )
            }
        };

        let mut session = Self::new(
            config,
            history,
            Arc::new(translator),
            Arc::new(ShellCommand::new(config.command.clone())),
            host,
        );
        session.notice = notice;
        Ok(session)
    }

    /// Number of rows: the two actions plus one per history record.
    pub fn num_entries(&self) -> usize {
        self.history.len() + FIRST_HISTORY_ROW
    }

    /// Resolve a displayed row.
    pub fn row(&self, row: usize) -> Option<Row> {
        match row {
            TOGGLE_ROW => Some(Row::Toggle),
            COPY_ROW => Some(Row::Copy),
            _ => row_to_history_index(row, self.history.len()).map(Row::History),
        }
    }

    /// React to the text in the input box.
    ///
    /// A changed input resets the view to brief and starts a translation.
    /// Returns the handle of the started request, if any.
    pub fn input_changed(&mut self, input: &str) -> Option<RequestHandle> {
        if input == self.last_input {
            return None;
        }
        self.last_input = input.to_string();
        self.detailed = false;
        self.notice = None;
        Some(self.runner.start(input))
    }

    /// Markup for the message area.
    pub fn message(&self) -> String {
        let translation = self.translation();
        let body = match &translation {
            Translation::Failed(error) => error_markup(error),
            other if self.detailed => markup::detailed(other.raw()),
            other => markup::brief(other.raw()),
        };
        match &self.notice {
            Some(notice) => format!("{}\n{}", error_markup(notice), body),
            None => body,
        }
    }

    /// Text shown for a row. All rows are markup.
    pub fn display_value(&self, row: usize) -> Option<String> {
        match self.row(row)? {
            Row::Toggle => Some(self.toggle_label().to_string()),
            Row::Copy => Some(LABEL_COPY.to_string()),
            Row::History(index) => self.history.get(index).map(str::to_string),
        }
    }

    /// Action rows always match; history rows match on their record text.
    pub fn token_match(&self, matcher: &dyn TokenMatcher, row: usize) -> bool {
        match self.row(row) {
            Some(Row::Toggle | Row::Copy) => true,
            Some(Row::History(index)) => self
                .history
                .get(index)
                .is_some_and(|record| matcher.matches(record)),
            None => false,
        }
    }

    /// Accept a row.
    pub fn select(&mut self, row: usize) -> Outcome {
        match self.row(row) {
            Some(Row::Toggle) => {
                self.toggle();
                Outcome::Reload
            }
            Some(Row::Copy) => match self.ready_record() {
                Some(record) => self.launch(&record),
                None => Outcome::Reload,
            },
            Some(Row::History(index)) => match self.history.get(index) {
                Some(record) => {
                    let record = record.to_string();
                    self.launch(&record)
                }
                None => Outcome::Reload,
            },
            None => {
                log::warn!("Selected row {} does not exist", row);
                Outcome::Reload
            }
        }
    }

    /// Delete the history record shown at `row`. Action rows are ignored.
    pub fn delete(&mut self, row: usize) -> Outcome {
        if let Some(Row::History(index)) = self.row(row) {
            match self.history.remove_at(index) {
                Ok(removed) => log::info!("Removed history record {:?}", removed),
                Err(e) => self.report(e.to_string()),
            }
        }
        Outcome::Reload
    }

    /// Flip between brief and detailed view.
    ///
    /// Switching to detailed records the current query in the history,
    /// unless its translation failed or has not arrived yet.
    pub fn toggle(&mut self) {
        self.detailed = !self.detailed;
        if !self.detailed {
            return;
        }
        let Some(record) = self.ready_record() else {
            return;
        };
        if let Err(e) = self.history.append(record) {
            self.report(e.to_string());
        }
    }

    /// Whether the translation of the current input is still running.
    pub fn is_pending(&self) -> bool {
        self.runner.slot().is_pending()
    }

    /// Record for the current query: `"<input>-><brief>"`.
    pub fn current_record(&self) -> String {
        format_record(&self.last_input, &markup::brief(self.translation().raw()))
    }

    /// Snapshot of the latest translation.
    pub fn translation(&self) -> Translation {
        self.runner.slot().get()
    }

    pub fn is_detailed(&self) -> bool {
        self.detailed
    }

    pub fn last_input(&self) -> &str {
        &self.last_input
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Error currently shown above the message.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The current record, if the slot holds a translation of `last_input`.
    fn ready_record(&self) -> Option<String> {
        if self.is_pending() {
            log::debug!("Translation of {:?} still running", self.last_input);
            return None;
        }
        if self.translation().is_failed() {
            log::debug!("Translation of {:?} failed", self.last_input);
            return None;
        }
        Some(self.current_record())
    }

    fn toggle_label(&self) -> &'static str {
        if self.detailed {
            LABEL_BRIEF
        } else {
            LABEL_DETAILED
        }
    }

    /// Run the command; stay open to show the error if it cannot start.
    fn launch(&mut self, record: &str) -> Outcome {
        match self.launcher.launch(record) {
            Ok(()) => Outcome::Exit,
            Err(e) => {
                self.report(e.to_string());
                Outcome::Reload
            }
        }
    }

    fn report(&mut self, message: String) {
        log::error!("{}", message);
        self.notice = Some(message);
    }
}

fn error_markup(text: &str) -> String {
    format!("<span foreground='red'>{}</span>", markup::escape(text))
}
