//! Ethereum infrastructure - Alloy client implementations

pub mod calls;
mod provider;

pub use provider::{connect_client, AlloyClient, ChainClient, ProviderConfig};
