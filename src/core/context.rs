//! Shared context passed to modules

use crate::core::contract::ContractEntry;

/// Currently selected item in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selected {
    None,
    Contract(ContractEntry),
}

/// Shared context available to all modules
#[derive(Debug)]
pub struct Context {
    /// Currently selected item
    pub selected: Selected,

    /// Wallet segment used when building routes
    pub wallet_segment: String,

    /// Clipboard content for copy/paste between widgets
    pub clipboard: Option<String>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            selected: Selected::None,
            wallet_segment: crate::core::route::WALLET_PLACEHOLDER.to_string(),
            clipboard: None,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected contract entry, if any.
    pub fn selected_entry(&self) -> Option<ContractEntry> {
        match self.selected {
            Selected::Contract(entry) => Some(entry),
            Selected::None => None,
        }
    }

    /// Set clipboard content
    pub fn set_clipboard(&mut self, content: String) {
        self.clipboard = Some(content);
    }

    /// Get clipboard content
    pub fn get_clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }
}
