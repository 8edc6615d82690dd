//! Per-chain query state and the cross-chain aggregate

use std::collections::BTreeMap;

use crate::core::chain::Chain;
use crate::core::contract::ContractEntry;

/// State of one chain's deployment listing. A chain that is not
/// configured, still in flight, or failed contributes zero entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainQuery {
    /// No endpoint configured for this chain.
    Disabled,
    /// Query issued, result not yet in.
    Pending,
    Ready(Vec<ContractEntry>),
    Failed(String),
}

impl ChainQuery {
    pub fn entries(&self) -> &[ContractEntry] {
        match self {
            ChainQuery::Ready(entries) => entries,
            _ => &[],
        }
    }

    pub fn count(&self) -> usize {
        self.entries().len()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ChainQuery::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChainQuery::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChainQuery::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ChainQuery::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Concatenate every chain's resolved entries in the fixed chain
/// order. Within one chain the delivered order is preserved. Entries
/// are never deduplicated across chains: (chain, address) is the
/// identity key.
pub fn aggregate(queries: &BTreeMap<Chain, ChainQuery>) -> Vec<ContractEntry> {
    let mut combined = Vec::new();
    for chain in Chain::ALL {
        if let Some(query) = queries.get(&chain) {
            combined.extend_from_slice(query.entries());
        }
    }
    combined
}

/// Chains whose query finished, successfully or not.
pub fn settled_count(queries: &BTreeMap<Chain, ChainQuery>) -> usize {
    queries
        .values()
        .filter(|q| q.is_ready() || q.is_failed())
        .count()
}
