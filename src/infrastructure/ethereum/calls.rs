//! Solidity call bindings for the deploy registry and deployed contracts

use alloy_primitives::B256;
use alloy_sol_types::sol;

sol! {
    /// On-chain registry mapping a deployer wallet to its contracts.
    interface IRegistry {
        function getAll(address _deployer) external view returns (address[] memory allDeployments);
    }

    /// Surface every deployed contract exposes.
    interface IContractInfo {
        function contractType() external pure returns (bytes32);
        function contractURI() external view returns (string memory);
    }

    /// Enumerable role-based access control.
    interface IPermissions {
        function getRoleMemberCount(bytes32 role) external view returns (uint256 count);
        function getRoleMember(bytes32 role, uint256 index) external view returns (address member);
        function grantRole(bytes32 role, address account) external;
        function revokeRole(bytes32 role, address account) external;
    }

    /// Delayed-reveal batches on drop contracts.
    interface IDelayedReveal {
        function reveal(uint256 identifier, bytes calldata key) external returns (string memory revealedURI);
    }
}

/// Decode the bytes32 returned by contractType() into its ASCII name.
///
/// The value is a short string padded with trailing zero bytes,
/// e.g. "DropERC721\0\0...".
pub fn decode_remote_name(raw: B256) -> String {
    let bytes = raw.as_slice();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
