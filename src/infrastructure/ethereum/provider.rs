//! Chain client abstraction and Alloy implementations
//!
//! Every call the dashboard makes against a chain goes through the
//! `ChainClient` trait so the worker can treat HTTP, WebSocket and IPC
//! endpoints uniformly.

#[cfg(unix)]
use std::path::PathBuf;

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::TransactionRequest;
use alloy_sol_types::SolCall;
use anyhow::{Context, Result};

use crate::infrastructure::ethereum::calls::{
    decode_remote_name, IContractInfo, IDelayedReveal, IPermissions, IRegistry,
};

/// Upper bound on role membership enumeration.
const MAX_ROLE_MEMBERS: u64 = 256;

/// Endpoint configuration
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Classify an endpoint string by its scheme.
    pub fn parse(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(ProviderConfig::Http(endpoint.to_string()));
        }
        if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
            return Ok(ProviderConfig::WebSocket(endpoint.to_string()));
        }
        #[cfg(unix)]
        if endpoint.ends_with(".ipc") || endpoint.starts_with('/') {
            return Ok(ProviderConfig::Ipc(PathBuf::from(endpoint)));
        }
        anyhow::bail!(
            "unsupported endpoint '{}': expected http(s)://, ws(s):// or an .ipc path",
            endpoint
        )
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }

    /// Check if this is a WebSocket endpoint
    pub fn is_websocket(&self) -> bool {
        matches!(self, ProviderConfig::WebSocket(_))
    }
}

/// Abstract chain client trait
///
/// All registry reads, metadata URI lookups and role mutations the
/// dashboard issues, abstracted over the Alloy transport.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync + 'static {
    /// Chain id reported by the node
    async fn chain_id(&self) -> Result<u64>;

    /// Every contract the wallet deployed through the registry
    async fn deployments(&self, registry: Address, wallet: Address) -> Result<Vec<Address>>;

    /// Remote type name of a deployed contract, e.g. "DropERC721"
    async fn contract_remote_name(&self, contract: Address) -> Result<String>;

    /// Metadata URI of a deployed contract
    async fn contract_uri(&self, contract: Address) -> Result<String>;

    /// Accounts the node manages (used to send mutations)
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Every member of a role on a contract
    async fn role_members(&self, contract: Address, role: B256) -> Result<Vec<Address>>;

    /// Grant a role to an account, returns the transaction hash
    async fn grant_role(
        &self,
        from: Address,
        contract: Address,
        role: B256,
        member: Address,
    ) -> Result<B256>;

    /// Revoke a role from an account, returns the transaction hash
    async fn revoke_role(
        &self,
        from: Address,
        contract: Address,
        role: B256,
        member: Address,
    ) -> Result<B256>;

    /// Reveal a delayed-reveal batch, returns the transaction hash
    async fn reveal_batch(
        &self,
        from: Address,
        contract: Address,
        batch: U256,
        key: Bytes,
    ) -> Result<B256>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

// Type aliases for the filled providers
type HttpFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

type WsFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

#[cfg(unix)]
type IpcFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Enum-based client that stores concrete types for each transport
pub enum AlloyClient {
    Http {
        provider: HttpFillProvider,
        endpoint: String,
    },
    WebSocket {
        provider: WsFillProvider,
        endpoint: String,
    },
    #[cfg(unix)]
    Ipc {
        provider: IpcFillProvider,
        endpoint: String,
    },
}

/// Create a client from configuration
pub async fn connect_client(config: ProviderConfig) -> Result<Box<dyn ChainClient>> {
    match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            let provider = ProviderBuilder::new().connect_http(rpc_url);
            Ok(Box::new(AlloyClient::Http {
                provider,
                endpoint: url,
            }))
        }
        ProviderConfig::WebSocket(url) => {
            let provider = ProviderBuilder::new()
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?;
            Ok(Box::new(AlloyClient::WebSocket {
                provider,
                endpoint: url,
            }))
        }
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc_path = path.to_string_lossy().to_string();
            let ipc = IpcConnect::new(ipc_path);
            let provider = ProviderBuilder::new()
                .connect_ipc(ipc)
                .await
                .context("Failed to create IPC provider")?;
            let display = path.display().to_string();
            Ok(Box::new(AlloyClient::Ipc {
                provider,
                endpoint: display,
            }))
        }
    }
}

// Macro to reduce code duplication for provider method implementations
macro_rules! impl_provider_method {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            AlloyClient::Http { provider, .. } => provider.$method($($arg),*).await,
            AlloyClient::WebSocket { provider, .. } => provider.$method($($arg),*).await,
            #[cfg(unix)]
            AlloyClient::Ipc { provider, .. } => provider.$method($($arg),*).await,
        }
    };
}

impl AlloyClient {
    /// eth_call against a contract with pre-encoded calldata
    async fn read(&self, contract: Address, data: Vec<u8>) -> Result<Bytes> {
        let request = TransactionRequest::default()
            .to(contract)
            .input(data.into());
        Ok(impl_provider_method!(self, call, request)?)
    }

    /// Submit a state-changing call through a node-managed account and
    /// wait for it to land.
    async fn submit(&self, from: Address, contract: Address, data: Vec<u8>) -> Result<B256> {
        let request = TransactionRequest::default()
            .from(from)
            .to(contract)
            .input(data.into());
        let pending = impl_provider_method!(self, send_transaction, request)?;
        Ok(pending.watch().await?)
    }
}

#[async_trait::async_trait]
impl ChainClient for AlloyClient {
    async fn chain_id(&self) -> Result<u64> {
        Ok(impl_provider_method!(self, get_chain_id)?)
    }

    async fn deployments(&self, registry: Address, wallet: Address) -> Result<Vec<Address>> {
        let data = IRegistry::getAllCall { _deployer: wallet }.abi_encode();
        let raw = self.read(registry, data).await?;
        let deployments = IRegistry::getAllCall::abi_decode_returns(&raw)
            .context("decode registry getAll response")?;
        Ok(deployments)
    }

    async fn contract_remote_name(&self, contract: Address) -> Result<String> {
        let data = IContractInfo::contractTypeCall {}.abi_encode();
        let raw = self.read(contract, data).await?;
        let name = IContractInfo::contractTypeCall::abi_decode_returns(&raw)
            .context("decode contractType response")?;
        Ok(decode_remote_name(name))
    }

    async fn contract_uri(&self, contract: Address) -> Result<String> {
        let data = IContractInfo::contractURICall {}.abi_encode();
        let raw = self.read(contract, data).await?;
        let uri = IContractInfo::contractURICall::abi_decode_returns(&raw)
            .context("decode contractURI response")?;
        Ok(uri)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(impl_provider_method!(self, get_accounts)?)
    }

    async fn role_members(&self, contract: Address, role: B256) -> Result<Vec<Address>> {
        let data = IPermissions::getRoleMemberCountCall { role }.abi_encode();
        let raw = self.read(contract, data).await?;
        let count = IPermissions::getRoleMemberCountCall::abi_decode_returns(&raw)
            .context("decode role member count")?;
        let count = count.saturating_to::<u64>().min(MAX_ROLE_MEMBERS);

        let mut members = Vec::with_capacity(count as usize);
        for index in 0..count {
            let data = IPermissions::getRoleMemberCall {
                role,
                index: U256::from(index),
            }
            .abi_encode();
            let raw = self.read(contract, data).await?;
            let member = IPermissions::getRoleMemberCall::abi_decode_returns(&raw)
                .context("decode role member")?;
            members.push(member);
        }
        Ok(members)
    }

    async fn grant_role(
        &self,
        from: Address,
        contract: Address,
        role: B256,
        member: Address,
    ) -> Result<B256> {
        let data = IPermissions::grantRoleCall {
            role,
            account: member,
        }
        .abi_encode();
        self.submit(from, contract, data).await
    }

    async fn revoke_role(
        &self,
        from: Address,
        contract: Address,
        role: B256,
        member: Address,
    ) -> Result<B256> {
        let data = IPermissions::revokeRoleCall {
            role,
            account: member,
        }
        .abi_encode();
        self.submit(from, contract, data).await
    }

    async fn reveal_batch(
        &self,
        from: Address,
        contract: Address,
        batch: U256,
        key: Bytes,
    ) -> Result<B256> {
        let data = IDelayedReveal::revealCall {
            identifier: batch,
            key,
        }
        .abi_encode();
        self.submit(from, contract, data).await
    }

    fn endpoint_name(&self) -> String {
        match self {
            AlloyClient::Http { endpoint, .. } => endpoint.clone(),
            AlloyClient::WebSocket { endpoint, .. } => endpoint.clone(),
            #[cfg(unix)]
            AlloyClient::Ipc { endpoint, .. } => endpoint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint_schemes() {
        assert!(matches!(
            ProviderConfig::parse("http://localhost:8545"),
            Ok(ProviderConfig::Http(_))
        ));
        assert!(matches!(
            ProviderConfig::parse("https://rpc.example.org"),
            Ok(ProviderConfig::Http(_))
        ));
        assert!(matches!(
            ProviderConfig::parse("ws://localhost:8546"),
            Ok(ProviderConfig::WebSocket(_))
        ));
        assert!(matches!(
            ProviderConfig::parse("wss://rpc.example.org"),
            Ok(ProviderConfig::WebSocket(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_ipc_path() {
        assert!(matches!(
            ProviderConfig::parse("/tmp/reth.ipc"),
            Ok(ProviderConfig::Ipc(_))
        ));
        assert!(matches!(
            ProviderConfig::parse("node.ipc"),
            Ok(ProviderConfig::Ipc(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        assert!(ProviderConfig::parse("ftp://example.org").is_err());
        assert!(ProviderConfig::parse("").is_err());
    }
}
