//! Contract metadata and the explicit per-row resolution cache
//!
//! Resolution is keyed (chain, address): a settled key is never
//! refetched until the whole cache is invalidated (wallet switch or
//! manual refresh), and a late result can only land in its own slot.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use thiserror::Error;

use crate::core::chain::Chain;
use crate::core::contract::ContractEntry;

/// Placeholder rendered while a row's metadata is unsettled.
pub const LOADING_PLACEHOLDER: &str = "Loading ...";

/// The display document a contract's metadata URI resolves to. The
/// worker extracts these fields from whatever JSON the gateway serves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl ContractMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            image: None,
        }
    }

    /// Deterministic metadata for mock mode.
    pub fn mock(seed: u64) -> Self {
        const NAMES: [&str; 8] = [
            "Genesis Drop",
            "Season Pass",
            "Treasury Split",
            "Governance",
            "Open Market",
            "Relic Pack",
            "Founders Edition",
            "Wrapped Points",
        ];
        let name = NAMES[(seed as usize) % NAMES.len()];
        Self {
            name: Some(format!("{} #{}", name, seed % 97)),
            description: Some(format!("Mock deployment {}", seed)),
            image: None,
        }
    }
}

/// Resolver failure taxonomy. Surfaced per row; never fatal.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("contract reports no metadata URI")]
    MissingUri,
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("gateway request failed: {0}")]
    Gateway(String),
    #[error("invalid metadata document: {0}")]
    Invalid(String),
}

/// One row's resolution state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataState {
    Loading,
    Ready(ContractMetadata),
    Failed(String),
}

/// Explicit cache keyed (chain, address).
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: BTreeMap<(Chain, Address), MetadataState>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: (Chain, Address)) -> Option<&MetadataState> {
        self.entries.get(&key)
    }

    /// Mark a key as in flight. Returns false when the key is already
    /// tracked, so callers do not issue redundant fetches.
    pub fn note_loading(&mut self, key: (Chain, Address)) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, MetadataState::Loading);
        true
    }

    pub fn insert_ready(&mut self, key: (Chain, Address), metadata: ContractMetadata) {
        self.entries.insert(key, MetadataState::Ready(metadata));
    }

    pub fn insert_failed(&mut self, key: (Chain, Address), error: String) {
        self.entries.insert(key, MetadataState::Failed(error));
    }

    /// Loading or absent keys count as unsettled.
    pub fn is_settled(&self, key: (Chain, Address)) -> bool {
        matches!(
            self.entries.get(&key),
            Some(MetadataState::Ready(_)) | Some(MetadataState::Failed(_))
        )
    }

    /// What the name cell shows: the placeholder until the fetch
    /// settles, then the resolved name, then the raw address when the
    /// name is missing or resolution failed.
    pub fn display_name(&self, entry: &ContractEntry) -> String {
        match self.entries.get(&entry.key()) {
            None | Some(MetadataState::Loading) => LOADING_PLACEHOLDER.to_string(),
            Some(MetadataState::Ready(meta)) => meta
                .name
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .map(|n| n.to_string())
                .unwrap_or_else(|| entry.address.to_string()),
            Some(MetadataState::Failed(_)) => entry.address.to_string(),
        }
    }

    /// Resolved name only, no placeholder or fallback.
    pub fn resolved_name(&self, key: (Chain, Address)) -> Option<String> {
        match self.entries.get(&key)? {
            MetadataState::Ready(meta) => meta.name.clone(),
            _ => None,
        }
    }

    pub fn metadata(&self, key: (Chain, Address)) -> Option<&ContractMetadata> {
        match self.entries.get(&key)? {
            MetadataState::Ready(meta) => Some(meta),
            _ => None,
        }
    }

    pub fn invalidate(&mut self, key: (Chain, Address)) {
        self.entries.remove(&key);
    }

    /// Drop everything: wallet switch or manual refresh.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contract::ContractType;

    fn entry(chain: Chain, byte: u8) -> ContractEntry {
        ContractEntry::new(chain, Address::repeat_byte(byte), ContractType::NftDrop)
    }

    #[test]
    fn test_display_name_lifecycle() {
        let mut cache = MetadataCache::new();
        let e = entry(Chain::Mainnet, 0x11);

        // Unknown and loading both render the placeholder.
        assert_eq!(cache.display_name(&e), LOADING_PLACEHOLDER);
        assert!(cache.note_loading(e.key()));
        assert_eq!(cache.display_name(&e), LOADING_PLACEHOLDER);

        cache.insert_ready(e.key(), ContractMetadata::named("My Drop"));
        assert_eq!(cache.display_name(&e), "My Drop");
    }

    #[test]
    fn test_missing_name_falls_back_to_address() {
        let mut cache = MetadataCache::new();
        let e = entry(Chain::Polygon, 0x22);
        cache.insert_ready(e.key(), ContractMetadata::default());
        assert_eq!(cache.display_name(&e), e.address.to_string());
    }

    #[test]
    fn test_failure_falls_back_to_address_and_stays_settled() {
        let mut cache = MetadataCache::new();
        let e = entry(Chain::Fantom, 0x33);
        assert!(cache.note_loading(e.key()));
        cache.insert_failed(e.key(), "gateway timeout".into());
        assert_eq!(cache.display_name(&e), e.address.to_string());
        assert!(cache.is_settled(e.key()));
        // A settled key must not be re-queued.
        assert!(!cache.note_loading(e.key()));
    }

    #[test]
    fn test_keys_are_chain_scoped() {
        let mut cache = MetadataCache::new();
        let mainnet = entry(Chain::Mainnet, 0x44);
        let polygon = entry(Chain::Polygon, 0x44);

        cache.insert_ready(mainnet.key(), ContractMetadata::named("Mainnet Name"));
        assert_eq!(cache.display_name(&mainnet), "Mainnet Name");
        // Same address on another chain stays unresolved.
        assert_eq!(cache.display_name(&polygon), LOADING_PLACEHOLDER);
    }

    #[test]
    fn test_note_loading_dedups() {
        let mut cache = MetadataCache::new();
        let key = entry(Chain::Goerli, 0x55).key();
        assert!(cache.note_loading(key));
        assert!(!cache.note_loading(key));
        cache.invalidate_all();
        assert!(cache.note_loading(key));
    }
}
