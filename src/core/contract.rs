//! Contract types, registry entries, and permission roles

use alloy_primitives::{keccak256, Address, B256};

use crate::core::chain::Chain;

/// The registry's contract families, each with a route slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContractType {
    NftDrop,
    NftCollection,
    EditionDrop,
    Edition,
    Token,
    Marketplace,
    Pack,
    Split,
    Vote,
}

impl ContractType {
    pub const ALL: [ContractType; 9] = [
        ContractType::NftDrop,
        ContractType::NftCollection,
        ContractType::EditionDrop,
        ContractType::Edition,
        ContractType::Token,
        ContractType::Marketplace,
        ContractType::Pack,
        ContractType::Split,
        ContractType::Vote,
    ];

    /// Segment used in dashboard routes.
    pub fn slug(&self) -> &'static str {
        match self {
            ContractType::NftDrop => "nft-drop",
            ContractType::NftCollection => "nft-collection",
            ContractType::EditionDrop => "edition-drop",
            ContractType::Edition => "edition",
            ContractType::Token => "token",
            ContractType::Marketplace => "marketplace",
            ContractType::Pack => "pack",
            ContractType::Split => "split",
            ContractType::Vote => "vote",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ContractType::NftDrop => "NFT Drop",
            ContractType::NftCollection => "NFT Collection",
            ContractType::EditionDrop => "Edition Drop",
            ContractType::Edition => "Edition",
            ContractType::Token => "Token",
            ContractType::Marketplace => "Marketplace",
            ContractType::Pack => "Pack",
            ContractType::Split => "Split",
            ContractType::Vote => "Vote",
        }
    }

    /// Map the registry's on-chain `contractType()` name to a type.
    pub fn from_remote_name(name: &str) -> Option<ContractType> {
        match name {
            "DropERC721" => Some(ContractType::NftDrop),
            "TokenERC721" => Some(ContractType::NftCollection),
            "DropERC1155" => Some(ContractType::EditionDrop),
            "TokenERC1155" => Some(ContractType::Edition),
            "TokenERC20" => Some(ContractType::Token),
            "Marketplace" => Some(ContractType::Marketplace),
            "Pack" => Some(ContractType::Pack),
            "Split" => Some(ContractType::Split),
            "VoteERC20" => Some(ContractType::Vote),
            _ => None,
        }
    }

    pub fn from_slug(value: &str) -> Option<ContractType> {
        let value = value.trim().to_lowercase();
        Self::ALL.iter().copied().find(|t| t.slug() == value)
    }

    /// Drops hold delayed-reveal batches.
    pub fn supports_reveal(&self) -> bool {
        matches!(self, ContractType::NftDrop | ContractType::EditionDrop)
    }

    /// Roles this family's access control exposes, admin first.
    pub fn roles(&self) -> &'static [Role] {
        match self {
            ContractType::NftDrop
            | ContractType::NftCollection
            | ContractType::EditionDrop
            | ContractType::Edition
            | ContractType::Token
            | ContractType::Pack => &[Role::Admin, Role::Minter, Role::Transfer],
            ContractType::Marketplace => &[Role::Admin, Role::Lister],
            ContractType::Split | ContractType::Vote => &[Role::Admin],
        }
    }
}

/// Access-control role on a deployed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    Minter,
    Transfer,
    Lister,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Minter => "minter",
            Role::Transfer => "transfer",
            Role::Lister => "lister",
        }
    }

    /// The bytes32 role identifier. The admin role is the zero hash;
    /// the rest hash their upper-case `*_ROLE` label.
    pub fn hash(&self) -> B256 {
        match self {
            Role::Admin => B256::ZERO,
            Role::Minter => keccak256(b"MINTER_ROLE"),
            Role::Transfer => keccak256(b"TRANSFER_ROLE"),
            Role::Lister => keccak256(b"LISTER_ROLE"),
        }
    }
}

/// One deployed contract as reported by a chain's registry.
/// Identity is the (chain, address) pair; the same address on two
/// chains is two distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractEntry {
    pub chain: Chain,
    pub address: Address,
    pub contract_type: ContractType,
}

impl ContractEntry {
    pub fn new(chain: Chain, address: Address, contract_type: ContractType) -> Self {
        Self {
            chain,
            address,
            contract_type,
        }
    }

    /// Cache/identity key.
    pub fn key(&self) -> (Chain, Address) {
        (self.chain, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs_match_route_segments() {
        let slugs: Vec<&str> = ContractType::ALL.iter().map(|t| t.slug()).collect();
        assert_eq!(
            slugs,
            vec![
                "nft-drop",
                "nft-collection",
                "edition-drop",
                "edition",
                "token",
                "marketplace",
                "pack",
                "split",
                "vote"
            ]
        );
    }

    #[test]
    fn test_remote_name_mapping() {
        assert_eq!(
            ContractType::from_remote_name("DropERC721"),
            Some(ContractType::NftDrop)
        );
        assert_eq!(
            ContractType::from_remote_name("TokenERC1155"),
            Some(ContractType::Edition)
        );
        assert_eq!(
            ContractType::from_remote_name("VoteERC20"),
            Some(ContractType::Vote)
        );
        assert_eq!(ContractType::from_remote_name("Greeter"), None);
    }

    #[test]
    fn test_roles_per_family() {
        assert_eq!(
            ContractType::NftDrop.roles(),
            &[Role::Admin, Role::Minter, Role::Transfer]
        );
        assert_eq!(ContractType::Marketplace.roles(), &[Role::Admin, Role::Lister]);
        assert_eq!(ContractType::Split.roles(), &[Role::Admin]);
    }

    #[test]
    fn test_admin_role_is_zero_hash() {
        assert_eq!(Role::Admin.hash(), B256::ZERO);
        assert_ne!(Role::Minter.hash(), B256::ZERO);
        assert_ne!(Role::Minter.hash(), Role::Transfer.hash());
    }

    #[test]
    fn test_reveal_support() {
        assert!(ContractType::NftDrop.supports_reveal());
        assert!(ContractType::EditionDrop.supports_reveal());
        assert!(!ContractType::Token.supports_reveal());
    }

    #[test]
    fn test_entry_identity_includes_chain() {
        let addr = Address::repeat_byte(0x11);
        let a = ContractEntry::new(Chain::Mainnet, addr, ContractType::Token);
        let b = ContractEntry::new(Chain::Polygon, addr, ContractType::Token);
        assert_ne!(a.key(), b.key());
    }
}
