//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based chain client implementations
//! - Static Solidity call bindings for the registry and contracts
//! - Tokio runtime bridge for async operations

pub mod ethereum;
pub mod runtime;

// Re-export types used by main.rs
pub use ethereum::ProviderConfig;
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent, WorkerConfig};
