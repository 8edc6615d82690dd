//! Actions handed back to the app loop by views and overlays

use alloy_primitives::Address;

use crate::core::chain::Chain;
use crate::core::contract::Role;

/// Where a navigation action lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateTarget {
    /// Leave the current view
    Back,
    /// The cross-chain contract table
    Registry,
    /// Detail view for the selected contract
    Detail,
    /// Deploy route for a chain
    Deploy(Chain),
}

/// Severity of a status toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

/// One-line input prompts the app runs on behalf of views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Switch the dashboard wallet
    Wallet,
    /// Add a member address to a role in the permission editor
    RoleMember { role: Role },
    /// Path for a media file or batch directory inspection
    MediaPath,
}

impl PromptKind {
    /// Placeholder text shown in the prompt line.
    pub fn label(&self) -> String {
        match self {
            PromptKind::Wallet => "wallet address or 'dashboard'".to_string(),
            PromptKind::RoleMember { role } => format!("address to add to {}", role.name()),
            PromptKind::MediaPath => "file or directory path".to_string(),
        }
    }
}

/// What a key handler asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do
    None,
    /// Move between views
    Navigate(NavigateTarget),
    /// Put a string on the system clipboard
    Copy(String),
    /// Show a status toast
    Notify(String, NotifyLevel),
    /// Open a one-line input prompt
    OpenPrompt(PromptKind),
    /// Close the active overlay
    CloseOverlay,
    /// Submit the permission editor's pending diff
    SubmitPermissions,
    /// Submit a reveal for a numbered batch
    SubmitReveal { batch: u64, password: String },
    /// A currency was chosen in the selector
    SelectCurrency {
        chain: Chain,
        address: Address,
        label: String,
    },
    /// Exit the application
    Quit,
}
