//! Dashboard route construction and wallet input validation
//!
//! Routes are pure functions of row fields so navigation, clipboard,
//! and export all derive the same path.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;

use crate::core::chain::Chain;
use crate::core::contract::ContractEntry;

/// The placeholder wallet segment used when no explicit address is
/// part of the route.
pub const WALLET_PLACEHOLDER: &str = "dashboard";

/// The wallet a listing is scoped to: either the literal placeholder
/// segment or a concrete address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletTarget {
    Placeholder,
    Address(Address),
}

impl WalletTarget {
    /// Parse wallet input. Accepts the placeholder or a 20-byte hex
    /// address; anything else is rejected at this boundary.
    pub fn parse(input: &str) -> Option<WalletTarget> {
        let trimmed = input.trim();
        if trimmed == WALLET_PLACEHOLDER {
            return Some(WalletTarget::Placeholder);
        }
        Address::from_str(trimmed).ok().map(WalletTarget::Address)
    }

    /// The route segment: the placeholder stays literal, addresses are
    /// checksummed.
    pub fn segment(&self) -> String {
        match self {
            WalletTarget::Placeholder => WALLET_PLACEHOLDER.to_string(),
            WalletTarget::Address(addr) => addr.to_string(),
        }
    }

    /// The address queries run against, falling back to the configured
    /// default when the placeholder is active.
    pub fn resolve(&self, default: Option<Address>) -> Option<Address> {
        match self {
            WalletTarget::Placeholder => default,
            WalletTarget::Address(addr) => Some(*addr),
        }
    }
}

impl fmt::Display for WalletTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment())
    }
}

/// `/{wallet}/{networkSlug}/{contractTypeSlug}/{address}`
pub fn contract_path(wallet_segment: &str, entry: &ContractEntry) -> String {
    format!(
        "/{}/{}/{}/{}",
        wallet_segment,
        entry.chain.slug(),
        entry.contract_type.slug(),
        entry.address
    )
}

/// `/{wallet}/{networkSlug}/new`
pub fn deploy_path(wallet_segment: &str, chain: Chain) -> String {
    format!("/{}/{}/new", wallet_segment, chain.slug())
}

/// Loose 20-byte hex shape check for input boundaries.
pub fn is_address(value: &str) -> bool {
    let value = value.trim();
    let Some(hex_part) = value.strip_prefix("0x") else {
        return false;
    };
    hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contract::ContractType;

    #[test]
    fn test_contract_path_scenario() {
        // Digit-only address keeps the checksummed display stable.
        let addr = Address::from_str("0x1111111111111111111111111111111111111111").unwrap();
        let entry = ContractEntry::new(Chain::Mainnet, addr, ContractType::NftDrop);
        assert_eq!(
            contract_path(WALLET_PLACEHOLDER, &entry),
            "/dashboard/ethereum/nft-drop/0x1111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn test_contract_path_uses_chain_slug() {
        let addr = Address::from_str("0x2222222222222222222222222222222222222222").unwrap();
        let entry = ContractEntry::new(Chain::Mumbai, addr, ContractType::Edition);
        assert_eq!(
            contract_path("dashboard", &entry),
            "/dashboard/mumbai/edition/0x2222222222222222222222222222222222222222"
        );
    }

    #[test]
    fn test_deploy_path() {
        assert_eq!(deploy_path("dashboard", Chain::Polygon), "/dashboard/polygon/new");
        assert_eq!(deploy_path("dashboard", Chain::Mainnet), "/dashboard/ethereum/new");
    }

    #[test]
    fn test_wallet_parse_placeholder() {
        assert_eq!(WalletTarget::parse("dashboard"), Some(WalletTarget::Placeholder));
        assert_eq!(WalletTarget::parse(" dashboard "), Some(WalletTarget::Placeholder));
    }

    #[test]
    fn test_wallet_parse_address_checksums_segment() {
        // EIP-55 reference vector.
        let target = WalletTarget::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(
            target.segment(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_wallet_parse_rejects_garbage() {
        assert_eq!(WalletTarget::parse("0xNonHex"), None);
        assert_eq!(WalletTarget::parse("vitalik.eth"), None);
        assert_eq!(WalletTarget::parse("0x1234"), None);
        assert_eq!(WalletTarget::parse(""), None);
    }

    #[test]
    fn test_wallet_resolve() {
        let default = Address::repeat_byte(0xab);
        assert_eq!(
            WalletTarget::Placeholder.resolve(Some(default)),
            Some(default)
        );
        assert_eq!(WalletTarget::Placeholder.resolve(None), None);
        let explicit = Address::repeat_byte(0xcd);
        assert_eq!(
            WalletTarget::Address(explicit).resolve(Some(default)),
            Some(explicit)
        );
    }

    #[test]
    fn test_is_address_shape() {
        assert!(is_address("0x1111111111111111111111111111111111111111"));
        assert!(is_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_address("0xNonHex"));
        assert!(!is_address("1111111111111111111111111111111111111111"));
        assert!(!is_address("0x11"));
    }
}
