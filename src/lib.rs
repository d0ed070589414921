// Library exports for the rofi translation mode and the standalone driver.
//
// # Threading
//
// The launcher calls the mode from a single event-loop thread. The only
// other threads are the per-request translation workers, which share
// nothing with the session except the `TranslationSlot` (a
// `parking_lot::Mutex`) and the host's redraw hook.

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod command;
pub mod debug;
pub mod error;
pub mod history;
pub mod host;
pub mod markup;
pub mod matching;
pub mod mode;
pub mod session;
pub mod translation;

pub use error::{CommandError, HistoryError, TranslationError};
pub use history::{History, format_record};
pub use mode::TsMode;
pub use rofi_ts_config::Config;
pub use session::{Outcome, Row, Session};
pub use translation::{Translate, Translation, TranslationRunner, TranslationSlot};
