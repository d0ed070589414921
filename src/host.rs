//! Contract with the list launcher hosting the mode.
//!
//! The launcher owns the window, the input box and the filtering; the mode
//! answers its queries and reacts to selections. These types mirror the
//! launcher's plugin interface: the `MENU_*` bits it reports for a
//! selection, the [`ModeMode`] it expects back, and the per-entry state
//! flags.

/// Bit set when the user accepted an entry.
pub const MENU_OK: u32 = 0x0001_0000;
/// Bit set when the user dismissed the launcher.
pub const MENU_CANCEL: u32 = 0x0002_0000;
/// Bit set when switching to the next mode.
pub const MENU_NEXT: u32 = 0x0004_0000;
/// Bit set when the accepted text matched no entry.
pub const MENU_CUSTOM_INPUT: u32 = 0x0008_0000;
/// Bit set when the user asked to delete an entry.
pub const MENU_ENTRY_DELETE: u32 = 0x0010_0000;
/// Bit set when jumping directly to another mode.
pub const MENU_QUICK_SWITCH: u32 = 0x0020_0000;
/// Bit set when switching to the previous mode.
pub const MENU_PREVIOUS: u32 = 0x0040_0000;
/// Carries the target mode of a quick switch.
pub const MENU_LOWER_MASK: u32 = 0x0000_FFFF;

/// Requests the mode can make of the launcher outside a host callback.
pub trait ListHost: Send + Sync {
    /// Ask the launcher to re-query entries and message and redraw.
    ///
    /// May be called from a worker thread.
    fn request_reload(&self);
}

/// Host that ignores redraw requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl ListHost for DetachedHost {
    fn request_reload(&self) {}
}

/// What the user did, decoded from the launcher's result bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuResult {
    /// Move to the next mode.
    Next,
    /// Move to the previous mode.
    Previous,
    /// Jump to the mode with this index.
    QuickSwitch(u32),
    /// Accept the selected entry.
    Accept,
    /// Delete the selected entry.
    Delete,
    /// Cancel, custom input, or anything else the mode does not handle.
    Other,
}

impl MenuResult {
    /// Decode `mretv`. Navigation bits take precedence over accept/delete.
    pub fn from_bits(mretv: u32) -> Self {
        if mretv & MENU_NEXT != 0 {
            MenuResult::Next
        } else if mretv & MENU_PREVIOUS != 0 {
            MenuResult::Previous
        } else if mretv & MENU_QUICK_SWITCH != 0 {
            MenuResult::QuickSwitch(mretv & MENU_LOWER_MASK)
        } else if mretv & MENU_OK != 0 {
            MenuResult::Accept
        } else if mretv & MENU_ENTRY_DELETE != 0 {
            MenuResult::Delete
        } else {
            MenuResult::Other
        }
    }
}

/// What the launcher should do after a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeMode {
    /// Close the launcher.
    Exit,
    /// Switch to the next mode.
    NextDialog,
    /// Re-query and redraw this mode.
    ReloadDialog,
    /// Switch to the previous mode.
    PreviousDialog,
    /// Switch to the mode with this index.
    Switch(u32),
}

impl ModeMode {
    /// Numeric value understood by the launcher.
    pub fn to_raw(self) -> u32 {
        match self {
            ModeMode::Exit => 1000,
            ModeMode::NextDialog => 1001,
            ModeMode::ReloadDialog => 1002,
            ModeMode::PreviousDialog => 1003,
            ModeMode::Switch(mode) => mode,
        }
    }
}

/// Per-entry state flags reported with a display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryState(u32);

impl EntryState {
    /// The entry text is markup.
    pub const MARKUP: u32 = 8;

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn insert(&mut self, flag: u32) {
        self.0 |= flag;
    }

    pub fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_precedence() {
        assert_eq!(MenuResult::from_bits(MENU_NEXT | MENU_OK), MenuResult::Next);
        assert_eq!(
            MenuResult::from_bits(MENU_PREVIOUS | MENU_ENTRY_DELETE),
            MenuResult::Previous
        );
        assert_eq!(
            MenuResult::from_bits(MENU_QUICK_SWITCH | 3),
            MenuResult::QuickSwitch(3)
        );
        assert_eq!(MenuResult::from_bits(MENU_OK), MenuResult::Accept);
        assert_eq!(
            MenuResult::from_bits(MENU_OK | MENU_ENTRY_DELETE),
            MenuResult::Accept
        );
        assert_eq!(MenuResult::from_bits(MENU_ENTRY_DELETE), MenuResult::Delete);
        assert_eq!(MenuResult::from_bits(MENU_CANCEL), MenuResult::Other);
        assert_eq!(MenuResult::from_bits(MENU_CUSTOM_INPUT), MenuResult::Other);
    }

    #[test]
    fn test_mode_mode_raw_values() {
        assert_eq!(ModeMode::Exit.to_raw(), 1000);
        assert_eq!(ModeMode::ReloadDialog.to_raw(), 1002);
        assert_eq!(ModeMode::Switch(2).to_raw(), 2);
    }

    #[test]
    fn test_entry_state_flags() {
        let mut state = EntryState::default();
        assert!(!state.contains(EntryState::MARKUP));
        state.insert(EntryState::MARKUP);
        assert!(state.contains(EntryState::MARKUP));
        assert_eq!(state.bits(), 8);
    }
}
