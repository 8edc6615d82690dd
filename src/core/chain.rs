//! Supported networks: identity, route slugs, aggregation order

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported network. Declaration order is the fixed aggregation
/// order: mainnets first, then test networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Chain {
    /// Ethereum mainnet (chain id 1). Route slug "ethereum".
    #[serde(rename = "ethereum")]
    Mainnet,
    /// Polygon mainnet (chain id 137).
    #[serde(rename = "polygon")]
    Polygon,
    /// Avalanche C-Chain (chain id 43114).
    #[serde(rename = "avalanche")]
    Avalanche,
    /// Fantom Opera (chain id 250).
    #[serde(rename = "fantom")]
    Fantom,
    /// Rinkeby testnet (chain id 4).
    #[serde(rename = "rinkeby")]
    Rinkeby,
    /// Goerli testnet (chain id 5).
    #[serde(rename = "goerli")]
    Goerli,
    /// Polygon Mumbai testnet (chain id 80001).
    #[serde(rename = "mumbai")]
    Mumbai,
}

impl Chain {
    /// Every supported chain, in aggregation order.
    pub const ALL: [Chain; 7] = [
        Chain::Mainnet,
        Chain::Polygon,
        Chain::Avalanche,
        Chain::Fantom,
        Chain::Rinkeby,
        Chain::Goerli,
        Chain::Mumbai,
    ];

    /// Numeric chain identifier.
    pub fn id(&self) -> u64 {
        match self {
            Chain::Mainnet => 1,
            Chain::Polygon => 137,
            Chain::Avalanche => 43114,
            Chain::Fantom => 250,
            Chain::Rinkeby => 4,
            Chain::Goerli => 5,
            Chain::Mumbai => 80001,
        }
    }

    /// Segment used in dashboard routes. Mainnet routes as "ethereum".
    pub fn slug(&self) -> &'static str {
        match self {
            Chain::Mainnet => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Avalanche => "avalanche",
            Chain::Fantom => "fantom",
            Chain::Rinkeby => "rinkeby",
            Chain::Goerli => "goerli",
            Chain::Mumbai => "mumbai",
        }
    }

    /// Human-readable network name.
    pub fn name(&self) -> &'static str {
        match self {
            Chain::Mainnet => "Ethereum",
            Chain::Polygon => "Polygon",
            Chain::Avalanche => "Avalanche",
            Chain::Fantom => "Fantom",
            Chain::Rinkeby => "Rinkeby",
            Chain::Goerli => "Goerli",
            Chain::Mumbai => "Mumbai",
        }
    }

    /// Symbol of the chain's native currency.
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Mainnet | Chain::Rinkeby | Chain::Goerli => "ETH",
            Chain::Polygon | Chain::Mumbai => "MATIC",
            Chain::Avalanche => "AVAX",
            Chain::Fantom => "FTM",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Chain::Rinkeby | Chain::Goerli | Chain::Mumbai)
    }

    /// Mainnets in aggregation order.
    pub fn mainnets() -> impl Iterator<Item = Chain> {
        Self::ALL.iter().copied().filter(|c| !c.is_testnet())
    }

    /// Testnets in aggregation order.
    pub fn testnets() -> impl Iterator<Item = Chain> {
        Self::ALL.iter().copied().filter(|c| c.is_testnet())
    }

    pub fn from_id(id: u64) -> Option<Chain> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// Parse a route slug or chain name, case-insensitively.
    /// "mainnet" is accepted as an alias for the "ethereum" slug.
    pub fn from_slug(value: &str) -> Option<Chain> {
        let value = value.trim().to_lowercase();
        if value == "mainnet" {
            return Some(Chain::Mainnet);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == value || c.name().to_lowercase() == value)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_order() {
        // Mainnets lead, testnets trail, in the documented order.
        let slugs: Vec<&str> = Chain::ALL.iter().map(|c| c.slug()).collect();
        assert_eq!(
            slugs,
            vec![
                "ethereum",
                "polygon",
                "avalanche",
                "fantom",
                "rinkeby",
                "goerli",
                "mumbai"
            ]
        );
    }

    #[test]
    fn test_chain_ids() {
        assert_eq!(Chain::Mainnet.id(), 1);
        assert_eq!(Chain::Polygon.id(), 137);
        assert_eq!(Chain::Avalanche.id(), 43114);
        assert_eq!(Chain::Fantom.id(), 250);
        assert_eq!(Chain::Rinkeby.id(), 4);
        assert_eq!(Chain::Goerli.id(), 5);
        assert_eq!(Chain::Mumbai.id(), 80001);
    }

    #[test]
    fn test_slug_round_trip() {
        for chain in Chain::ALL {
            assert_eq!(Chain::from_slug(chain.slug()), Some(chain));
            assert_eq!(Chain::from_id(chain.id()), Some(chain));
        }
        assert_eq!(Chain::from_slug("mainnet"), Some(Chain::Mainnet));
        assert_eq!(Chain::from_slug("Ethereum"), Some(Chain::Mainnet));
        assert_eq!(Chain::from_slug("base"), None);
    }

    #[test]
    fn test_testnet_split() {
        let mainnets: Vec<Chain> = Chain::mainnets().collect();
        let testnets: Vec<Chain> = Chain::testnets().collect();
        assert_eq!(
            mainnets,
            vec![
                Chain::Mainnet,
                Chain::Polygon,
                Chain::Avalanche,
                Chain::Fantom
            ]
        );
        assert_eq!(
            testnets,
            vec![Chain::Rinkeby, Chain::Goerli, Chain::Mumbai]
        );
    }
}
