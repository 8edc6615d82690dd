//! Explicit table filter state and the pure row predicate
//!
//! The table never filters on its own: it renders whatever indices
//! this module hands back for the current `FilterState`. Both column
//! filters are multi-select sets that default to everything selected;
//! an empty set therefore matches nothing, which mirrors the observed
//! membership-check behavior and is surfaced in the UI as "0 of N".

use std::collections::BTreeSet;

use crate::core::chain::Chain;
use crate::core::contract::{ContractEntry, ContractType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub types: BTreeSet<ContractType>,
    pub chains: BTreeSet<Chain>,
    pub text: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            types: ContractType::ALL.iter().copied().collect(),
            chains: Chain::ALL.iter().copied().collect(),
            text: None,
        }
    }
}

impl FilterState {
    /// True when no filtering is in effect.
    pub fn is_default(&self) -> bool {
        self.types.len() == ContractType::ALL.len()
            && self.chains.len() == Chain::ALL.len()
            && self.text.is_none()
    }

    pub fn reset(&mut self) {
        *self = FilterState::default();
    }

    /// The row predicate. `name` is the resolved display name, if any,
    /// so the free-text filter can see what the user sees.
    pub fn matches(&self, entry: &ContractEntry, name: Option<&str>) -> bool {
        if !self.types.contains(&entry.contract_type) {
            return false;
        }
        if !self.chains.contains(&entry.chain) {
            return false;
        }
        match self.text.as_deref() {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                let address = format!("{:#x}", entry.address);
                address.contains(&needle)
                    || name
                        .map(|n| n.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                    || entry.contract_type.slug().contains(&needle)
                    || entry
                        .contract_type
                        .display_name()
                        .to_lowercase()
                        .contains(&needle)
                    || entry.chain.slug().contains(&needle)
                    || entry.chain.name().to_lowercase().contains(&needle)
            }
        }
    }

    /// Indices into `entries` that pass the filter, in order.
    pub fn row_indices<F>(&self, entries: &[ContractEntry], name_of: F) -> Vec<usize>
    where
        F: Fn(&ContractEntry) -> Option<String>,
    {
        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.matches(entry, name_of(entry).as_deref()))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn toggle_type(&mut self, ty: ContractType) {
        if !self.types.remove(&ty) {
            self.types.insert(ty);
        }
    }

    pub fn toggle_chain(&mut self, chain: Chain) {
        if !self.chains.remove(&chain) {
            self.chains.insert(chain);
        }
    }

    pub fn select_all_types(&mut self) {
        self.types = ContractType::ALL.iter().copied().collect();
    }

    pub fn clear_types(&mut self) {
        self.types.clear();
    }

    pub fn select_all_chains(&mut self) {
        self.chains = Chain::ALL.iter().copied().collect();
    }

    pub fn clear_chains(&mut self) {
        self.chains.clear();
    }

    /// Apply one `:filter` argument string. Tokens are either
    /// `type:<slugs>` / `chain:<slugs>` (comma-separated) or free text.
    /// `clear` / `reset` restores the default state. Returns an error
    /// message for unknown slugs.
    pub fn apply_spec(&mut self, input: &str) -> Result<(), String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err("usage: :filter [type:<slugs>] [chain:<slugs>] [text]".into());
        }
        if trimmed.eq_ignore_ascii_case("clear") || trimmed.eq_ignore_ascii_case("reset") {
            self.reset();
            return Ok(());
        }

        let mut free_text: Vec<&str> = Vec::new();
        for token in trimmed.split_whitespace() {
            if let Some(list) = token.strip_prefix("type:") {
                let mut set = BTreeSet::new();
                for slug in list.split(',').filter(|s| !s.is_empty()) {
                    match ContractType::from_slug(slug) {
                        Some(ty) => {
                            set.insert(ty);
                        }
                        None => return Err(format!("unknown contract type: {}", slug)),
                    }
                }
                self.types = set;
            } else if let Some(list) = token.strip_prefix("chain:") {
                let mut set = BTreeSet::new();
                for slug in list.split(',').filter(|s| !s.is_empty()) {
                    match Chain::from_slug(slug) {
                        Some(chain) => {
                            set.insert(chain);
                        }
                        None => return Err(format!("unknown chain: {}", slug)),
                    }
                }
                self.chains = set;
            } else {
                free_text.push(token);
            }
        }
        if !free_text.is_empty() {
            self.text = Some(free_text.join(" "));
        }
        Ok(())
    }

    /// Short description for panel titles, None when unfiltered.
    pub fn summary(&self) -> Option<String> {
        if self.is_default() {
            return None;
        }
        let mut parts = Vec::new();
        if self.types.len() != ContractType::ALL.len() {
            parts.push(format!("types {}/{}", self.types.len(), ContractType::ALL.len()));
        }
        if self.chains.len() != Chain::ALL.len() {
            parts.push(format!("chains {}/{}", self.chains.len(), Chain::ALL.len()));
        }
        if let Some(text) = self.text.as_deref() {
            parts.push(format!("\"{}\"", text));
        }
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    fn entry(chain: Chain, ty: ContractType, byte: u8) -> ContractEntry {
        ContractEntry::new(chain, Address::repeat_byte(byte), ty)
    }

    fn sample() -> Vec<ContractEntry> {
        vec![
            entry(Chain::Mainnet, ContractType::NftDrop, 0x01),
            entry(Chain::Mainnet, ContractType::Token, 0x02),
            entry(Chain::Polygon, ContractType::NftDrop, 0x03),
            entry(Chain::Mumbai, ContractType::Marketplace, 0x04),
        ]
    }

    #[test]
    fn test_default_is_identity() {
        let entries = sample();
        let filter = FilterState::default();
        let indices = filter.row_indices(&entries, |_| None);
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(filter.is_default());
    }

    #[test]
    fn test_single_type_selection_is_exact_subset() {
        let entries = sample();
        let mut filter = FilterState::default();
        filter.types = [ContractType::NftDrop].into_iter().collect();
        let indices = filter.row_indices(&entries, |_| None);
        assert_eq!(indices, vec![0, 2]);
        for idx in indices {
            assert_eq!(entries[idx].contract_type, ContractType::NftDrop);
        }
    }

    #[test]
    fn test_chain_selection() {
        let entries = sample();
        let mut filter = FilterState::default();
        filter.chains = [Chain::Mainnet].into_iter().collect();
        assert_eq!(filter.row_indices(&entries, |_| None), vec![0, 1]);
    }

    #[test]
    fn test_empty_selection_shows_nothing() {
        let entries = sample();
        let mut filter = FilterState::default();
        filter.clear_types();
        assert!(filter.row_indices(&entries, |_| None).is_empty());

        let mut filter = FilterState::default();
        filter.clear_chains();
        assert!(filter.row_indices(&entries, |_| None).is_empty());
    }

    #[test]
    fn test_text_matches_name_and_address() {
        let entries = sample();
        let mut filter = FilterState::default();
        filter.text = Some("genesis".into());
        let named = filter.row_indices(&entries, |e| {
            (e.address == Address::repeat_byte(0x02)).then(|| "Genesis Token".to_string())
        });
        assert_eq!(named, vec![1]);

        filter.text = Some("0x0303".into());
        assert_eq!(filter.row_indices(&entries, |_| None), vec![2]);
    }

    #[test]
    fn test_apply_spec() {
        let mut filter = FilterState::default();
        filter
            .apply_spec("type:nft-drop,token chain:ethereum")
            .unwrap();
        assert_eq!(filter.types.len(), 2);
        assert_eq!(filter.chains.len(), 1);

        assert!(filter.apply_spec("type:bogus").is_err());
        assert!(filter.apply_spec("chain:base").is_err());

        filter.apply_spec("clear").unwrap();
        assert!(filter.is_default());

        filter.apply_spec("my collection").unwrap();
        assert_eq!(filter.text.as_deref(), Some("my collection"));
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut filter = FilterState::default();
        filter.toggle_type(ContractType::Vote);
        assert!(!filter.types.contains(&ContractType::Vote));
        filter.toggle_type(ContractType::Vote);
        assert!(filter.types.contains(&ContractType::Vote));
    }

    #[test]
    fn test_summary() {
        let mut filter = FilterState::default();
        assert_eq!(filter.summary(), None);
        filter.chains = [Chain::Polygon].into_iter().collect();
        filter.text = Some("drop".into());
        let summary = filter.summary().unwrap();
        assert!(summary.contains("chains 1/7"));
        assert!(summary.contains("\"drop\""));
    }
}
