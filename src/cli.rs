//! Command-line interface for the standalone `rofi-ts` driver.
//!
//! Drives a [`Session`] without the launcher: translate a query, inspect or
//! prune the history. Useful for scripting and for checking a setup.

use crate::debug;
use crate::host::ListHost;
use crate::markup;
use crate::session::{COPY_ROW, FIRST_HISTORY_ROW, Session};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rofi_ts_config::{Config, LogLevel, OPT_COMMAND, OPT_HISTORY, OPT_TRANSLATOR};
use std::path::PathBuf;
use std::sync::Arc;

/// rofi-ts - translate from the launcher, or from the shell
#[derive(Parser)]
#[command(name = "rofi-ts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to read instead of ~/.config/rofi-ts/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Debug log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level, global = true)]
    pub log_level: Option<LogLevel>,

    /// Command template for the copy action; `{result}` is replaced
    #[arg(long, value_name = "TEMPLATE", global = true)]
    pub ts_command: Option<String>,

    /// Translator command line (default: trans)
    #[arg(long, value_name = "COMMAND", global = true)]
    pub translator: Option<String>,

    /// History file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub history_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a query and print the message markup
    Translate {
        /// Text to translate
        #[arg(required = true)]
        query: Vec<String>,

        /// Print the full translation instead of the brief line
        #[arg(long)]
        detailed: bool,

        /// Record the query in the history
        #[arg(long)]
        save: bool,

        /// Run the copy command on the result
        #[arg(long)]
        copy: bool,
    },
    /// Inspect or edit the history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List records as the launcher shows them, newest first
    List,
    /// Delete the record shown at ROW (as printed by `list`)
    Delete {
        /// Row number
        row: usize,
    },
    /// Print the history file path
    Path,
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::from_name(value).ok_or_else(|| format!("unknown log level '{value}'"))
}

/// Forwards redraw requests nowhere; the CLI joins the request instead.
struct PrintHost;

impl ListHost for PrintHost {
    fn request_reload(&self) {
        log::debug!("Translation ready");
    }
}

impl Cli {
    /// Resolve the configuration: file first, then command-line overrides.
    pub fn resolve_config(&self) -> Result<Config> {
        let path = self.config.clone().unwrap_or_else(Config::config_path);
        let mut config = Config::load_from(&path)
            .with_context(|| format!("loading config {}", path.display()))?;

        let mut overrides: Vec<String> = Vec::new();
        if let Some(template) = &self.ts_command {
            overrides.extend([OPT_COMMAND.to_string(), template.clone()]);
        }
        if let Some(translator) = &self.translator {
            overrides.extend([OPT_TRANSLATOR.to_string(), translator.clone()]);
        }
        if let Some(history) = &self.history_file {
            overrides.extend([
                OPT_HISTORY.to_string(),
                history.to_string_lossy().into_owned(),
            ]);
        }
        config.apply_host_args(&overrides)?;
        Ok(config)
    }
}

/// Parse arguments, set up logging and run the requested command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let level = debug::resolve_level(
        cli.log_level,
        std::env::var("RUST_LOG").ok().as_deref(),
        std::env::var("DEBUG_LEVEL").ok().as_deref(),
        config.log_level,
    );
    debug::init_log_bridge(level);
    log::info!("Starting rofi-ts {}", crate::VERSION);

    let mut session = Session::open(&config, Arc::new(PrintHost))?;

    match cli.command {
        Commands::Translate {
            query,
            detailed,
            save,
            copy,
        } => translate(&mut session, &query.join(" "), detailed, save, copy),
        Commands::History { action } => run_history(&mut session, action, &config),
    }
}

fn translate(
    session: &mut Session,
    query: &str,
    detailed: bool,
    save: bool,
    copy: bool,
) -> Result<()> {
    if let Some(request) = session.input_changed(query) {
        request.join();
    }

    let translation = session.translation();
    if translation.is_failed() {
        bail!("{}", translation.raw());
    }
    if detailed {
        print!("{}", markup::detailed(translation.raw()));
    } else {
        println!("{}", markup::brief(translation.raw()));
    }

    if save {
        session.toggle();
    }
    if copy {
        session.select(COPY_ROW);
    }
    report_notice(session)
}

fn run_history(session: &mut Session, action: HistoryAction, config: &Config) -> Result<()> {
    report_notice(session)?;
    match action {
        HistoryAction::List => {
            for row in FIRST_HISTORY_ROW..session.num_entries() {
                if let Some(record) = session.display_value(row) {
                    println!("{row}\t{record}");
                }
            }
            Ok(())
        }
        HistoryAction::Delete { row } => {
            if session.row(row).is_none() || row < FIRST_HISTORY_ROW {
                bail!("no history record at row {row}");
            }
            session.delete(row);
            report_notice(session)
        }
        HistoryAction::Path => {
            println!("{}", config.history_path().display());
            Ok(())
        }
    }
}

fn report_notice(session: &Session) -> Result<()> {
    match session.notice() {
        Some(notice) => bail!("{notice}"),
        None => Ok(()),
    }
}
