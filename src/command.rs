//! External command runner for the copy and history actions.
//!
//! The user supplies a shell template through `-ts-command`; every literal
//! `{result}` is replaced with the record text and the outcome is run with
//! `/bin/sh -c`. The record is inserted verbatim, so templates are expected
//! to do their own quoting (e.g. `echo -n '{result}' | xclip`).

use crate::error::CommandError;
use rofi_ts_config::RESULT_PLACEHOLDER;
use std::process::{Child, Command, Stdio};

/// Shell used to run the command template.
const SHELL: &str = "/bin/sh";

/// Hands a record to whatever the user configured.
pub trait Launcher: Send + Sync {
    /// Launch the configured action for `record`. Does not wait for it.
    fn launch(&self, record: &str) -> Result<(), CommandError>;
}

/// Replace every `{result}` in `template` with `record`.
pub fn substitute(template: &str, record: &str) -> String {
    template.replace(RESULT_PLACEHOLDER, record)
}

/// Runs the `-ts-command` template through `/bin/sh -c`.
#[derive(Debug, Clone, Default)]
pub struct ShellCommand {
    template: Option<String>,
}

impl ShellCommand {
    pub fn new(template: Option<String>) -> Self {
        Self { template }
    }

    /// Whether a template is configured.
    pub fn is_configured(&self) -> bool {
        self.template.is_some()
    }

    /// Spawn the shell for `record`. `None` when no template is configured.
    pub fn spawn(&self, record: &str) -> Result<Option<Child>, CommandError> {
        let Some(template) = self.template.as_deref() else {
            log::debug!("No command template configured, ignoring {:?}", record);
            return Ok(None);
        };

        let command = substitute(template, record);
        log::info!("Running command: {}", command);
        let child = Command::new(SHELL)
            .arg("-c")
            .arg(&command)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| CommandError::Spawn { command, source })?;
        Ok(Some(child))
    }
}

impl Launcher for ShellCommand {
    fn launch(&self, record: &str) -> Result<(), CommandError> {
        let Some(mut child) = self.spawn(record)? else {
            return Ok(());
        };
        // Reap in the background so the event loop never blocks on the command
        let spawned = std::thread::Builder::new()
            .name("ts-command".into())
            .spawn(move || match child.wait() {
                Ok(status) if status.success() => log::debug!("Command finished"),
                Ok(status) => log::warn!("Command exited with {}", status),
                Err(e) => log::error!("Waiting for command failed: {}", e),
            });
        if let Err(e) = spawned {
            log::warn!("Could not start command reaper thread: {}", e);
        }
        Ok(())
    }
}
