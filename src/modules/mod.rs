//! UI Modules
//!
//! Each overlay implements the Module trait and handles its own:
//! - Key input processing
//! - Rendering
//!
//! Modules:
//! - permissions: role membership editor with grant/revoke diffing
//! - currency: per-chain currency picker with custom address entry
//! - reveal: delayed-reveal password dialog for drop contracts
//! - media: file kind detection and batch directory summaries
//! - deploy: network picker resolving deploy routes
//! - export: CSV export of the visible contract list

pub mod currency;
pub mod deploy;
pub mod export;
pub mod media;
pub mod permissions;
pub mod reveal;

pub use currency::CurrencyPicker;
pub use deploy::DeployPicker;
pub use media::MediaInspector;
pub use permissions::PermissionEditor;
pub use reveal::RevealDialog;
