//! Async worker - runs in Tokio runtime and handles chain operations

use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256};
use anyhow::Result;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::core::chain::Chain;
use crate::core::contract::{ContractEntry, ContractType, Role};
use crate::domain::metadata::{ContractMetadata, MetadataError};
use crate::infrastructure::ethereum::{connect_client, ChainClient, ProviderConfig};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent, WorkerConfig};
use crate::store::MetadataStore;

/// Results spawned tasks report back to the worker loop. Everything is
/// routed through one channel so the loop stays the only place that
/// touches the SQLite connection.
enum TaskResult {
    /// A fresh client connected; cache it for later commands
    Connected {
        chain: Chain,
        client: Arc<dyn ChainClient>,
    },
    /// A metadata fetch settled; persist successes before forwarding
    Metadata {
        generation: u64,
        chain: Chain,
        address: Address,
        uri: Option<String>,
        outcome: Result<ContractMetadata, String>,
    },
    /// Forward an event as-is
    Event(RuntimeEvent),
}

/// Run the async worker loop
pub async fn run_async_worker(
    config: WorkerConfig,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    if config.endpoints.is_empty() {
        anyhow::bail!("No endpoints configured");
    }

    let WorkerConfig {
        mut endpoints,
        registries,
        gateway,
        cache_path,
    } = config;

    // Per-chain clients, connected lazily on first use
    let mut clients: BTreeMap<Chain, Arc<dyn ChainClient>> = BTreeMap::new();

    // The metadata cache connection never leaves this task
    let store = match cache_path.as_deref() {
        Some(path) => match MetadataStore::open(path) {
            Ok(store) => Some(store),
            Err(err) => {
                let _ = evt_tx.send(RuntimeEvent::Error {
                    message: format!("Metadata cache disabled: {:#}", err),
                });
                None
            }
        },
        None => None,
    };

    // Gateway fetches share one HTTP client
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let (task_tx, mut task_rx) = unbounded_channel::<TaskResult>();

    loop {
        // Process commands (non-blocking)
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                RuntimeCommand::Shutdown => return Ok(()),

                RuntimeCommand::FetchDeployments { generation, wallet } => {
                    // One independent task per configured chain; results
                    // arrive in any order and the UI re-merges on each.
                    for chain in Chain::ALL {
                        let Some(endpoint) = endpoints.get(&chain).cloned() else {
                            continue;
                        };
                        let Some(registry) = registries.get(&chain).copied() else {
                            continue;
                        };
                        let existing = clients.get(&chain).map(Arc::clone);
                        let task_tx = task_tx.clone();
                        tokio::spawn(async move {
                            list_chain_deployments(
                                chain, existing, endpoint, registry, wallet, generation, task_tx,
                            )
                            .await;
                        });
                    }
                }

                RuntimeCommand::FetchMetadata {
                    generation,
                    chain,
                    address,
                    force,
                } => {
                    // Serve from the persistent cache unless forced
                    if !force {
                        if let Some(store) = &store {
                            if let Ok(Some(cached)) =
                                store.get(chain.id(), &format!("{:#x}", address))
                            {
                                let _ = evt_tx.send(RuntimeEvent::MetadataReady {
                                    generation,
                                    chain,
                                    address,
                                    metadata: cached.metadata,
                                });
                                continue;
                            }
                        }
                    }

                    let Some(endpoint) = endpoints.get(&chain).cloned() else {
                        continue;
                    };
                    let existing = clients.get(&chain).map(Arc::clone);
                    let http = http.clone();
                    let gateway = gateway.clone();
                    let task_tx = task_tx.clone();
                    tokio::spawn(async move {
                        resolve_contract_metadata(
                            chain, existing, endpoint, address, generation, http, gateway, task_tx,
                        )
                        .await;
                    });
                }

                RuntimeCommand::FetchRoles {
                    chain,
                    address,
                    roles,
                } => {
                    let Some(endpoint) = endpoints.get(&chain).cloned() else {
                        continue;
                    };
                    let existing = clients.get(&chain).map(Arc::clone);
                    let task_tx = task_tx.clone();
                    tokio::spawn(async move {
                        enumerate_roles(chain, existing, endpoint, address, roles, task_tx).await;
                    });
                }

                RuntimeCommand::ApplyRoleChanges {
                    chain,
                    address,
                    grants,
                    revokes,
                } => {
                    let Some(endpoint) = endpoints.get(&chain).cloned() else {
                        continue;
                    };
                    let existing = clients.get(&chain).map(Arc::clone);
                    let task_tx = task_tx.clone();
                    tokio::spawn(async move {
                        apply_role_changes(
                            chain, existing, endpoint, address, grants, revokes, task_tx,
                        )
                        .await;
                    });
                }

                RuntimeCommand::Reveal {
                    chain,
                    address,
                    batch,
                    password,
                } => {
                    let Some(endpoint) = endpoints.get(&chain).cloned() else {
                        continue;
                    };
                    let existing = clients.get(&chain).map(Arc::clone);
                    let task_tx = task_tx.clone();
                    tokio::spawn(async move {
                        reveal_batch(chain, existing, endpoint, address, batch, password, task_tx)
                            .await;
                    });
                }

                RuntimeCommand::Connect { chain, endpoint } => {
                    endpoints.insert(chain, endpoint.clone());
                    clients.remove(&chain);
                    let task_tx = task_tx.clone();
                    tokio::spawn(async move {
                        match resolve_client(None, endpoint).await {
                            Ok((client, _)) => {
                                let _ = task_tx.send(TaskResult::Connected { chain, client });
                            }
                            Err(message) => {
                                let _ = task_tx.send(TaskResult::Event(RuntimeEvent::Error {
                                    message: format!(
                                        "Connection failed ({}): {}",
                                        chain.name(),
                                        message
                                    ),
                                }));
                            }
                        }
                    });
                }
            }
        }

        // Drain task results: persist, cache clients, forward events
        while let Ok(result) = task_rx.try_recv() {
            match result {
                TaskResult::Connected { chain, client } => {
                    let _ = evt_tx.send(RuntimeEvent::ChainConnected {
                        chain,
                        endpoint: client.endpoint_name(),
                    });
                    clients.insert(chain, client);
                }
                TaskResult::Metadata {
                    generation,
                    chain,
                    address,
                    uri,
                    outcome,
                } => match outcome {
                    Ok(metadata) => {
                        if let Some(store) = &store {
                            let _ = store.save(
                                chain.id(),
                                &format!("{:#x}", address),
                                uri.as_deref(),
                                &metadata,
                            );
                        }
                        let _ = evt_tx.send(RuntimeEvent::MetadataReady {
                            generation,
                            chain,
                            address,
                            metadata,
                        });
                    }
                    Err(message) => {
                        let _ = evt_tx.send(RuntimeEvent::MetadataFailed {
                            generation,
                            chain,
                            address,
                            message,
                        });
                    }
                },
                TaskResult::Event(event) => {
                    let _ = evt_tx.send(event);
                }
            }
        }

        // Small yield to prevent busy loop
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Reuse a cached client or connect the chain's endpoint. The second
/// tuple field is true when the connection is fresh and should be
/// reported back for caching.
async fn resolve_client(
    existing: Option<Arc<dyn ChainClient>>,
    endpoint: ProviderConfig,
) -> Result<(Arc<dyn ChainClient>, bool), String> {
    if let Some(client) = existing {
        return Ok((client, false));
    }
    match connect_client(endpoint).await {
        Ok(client) => Ok((Arc::from(client), true)),
        Err(err) => Err(format!("{:#}", err)),
    }
}

/// Query one chain's registry and tag each deployment with its type.
async fn list_chain_deployments(
    chain: Chain,
    existing: Option<Arc<dyn ChainClient>>,
    endpoint: ProviderConfig,
    registry: Address,
    wallet: Address,
    generation: u64,
    task_tx: UnboundedSender<TaskResult>,
) {
    let (client, fresh) = match resolve_client(existing, endpoint).await {
        Ok(pair) => pair,
        Err(message) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::ChainFailed {
                generation,
                chain,
                message,
            }));
            return;
        }
    };
    if fresh {
        let _ = task_tx.send(TaskResult::Connected {
            chain,
            client: Arc::clone(&client),
        });
    }

    let addresses = match client.deployments(registry, wallet).await {
        Ok(addresses) => addresses,
        Err(err) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::ChainFailed {
                generation,
                chain,
                message: format!("{:#}", err),
            }));
            return;
        }
    };

    let mut entries = Vec::with_capacity(addresses.len());
    for address in addresses {
        // Contracts with an unrecognized type name are not listable
        // and are skipped.
        let remote_name = match client.contract_remote_name(address).await {
            Ok(name) => name,
            Err(_) => continue,
        };
        if let Some(contract_type) = ContractType::from_remote_name(&remote_name) {
            entries.push(ContractEntry::new(chain, address, contract_type));
        }
    }

    let _ = task_tx.send(TaskResult::Event(RuntimeEvent::Deployments {
        generation,
        chain,
        entries,
    }));
}

/// Resolve a contract's metadata document through the gateway.
#[allow(clippy::too_many_arguments)]
async fn resolve_contract_metadata(
    chain: Chain,
    existing: Option<Arc<dyn ChainClient>>,
    endpoint: ProviderConfig,
    address: Address,
    generation: u64,
    http: reqwest::Client,
    gateway: String,
    task_tx: UnboundedSender<TaskResult>,
) {
    let (client, fresh) = match resolve_client(existing, endpoint).await {
        Ok(pair) => pair,
        Err(message) => {
            let _ = task_tx.send(TaskResult::Metadata {
                generation,
                chain,
                address,
                uri: None,
                outcome: Err(message),
            });
            return;
        }
    };
    if fresh {
        let _ = task_tx.send(TaskResult::Connected {
            chain,
            client: Arc::clone(&client),
        });
    }

    let (uri, outcome) = match fetch_metadata(client.as_ref(), address, &http, &gateway).await {
        Ok((uri, metadata)) => (Some(uri), Ok(metadata)),
        Err(err) => (None, Err(err.to_string())),
    };
    let _ = task_tx.send(TaskResult::Metadata {
        generation,
        chain,
        address,
        uri,
        outcome,
    });
}

/// contractURI() then the gateway fetch of its JSON document.
async fn fetch_metadata(
    client: &dyn ChainClient,
    address: Address,
    http: &reqwest::Client,
    gateway: &str,
) -> Result<(String, ContractMetadata), MetadataError> {
    let uri = client
        .contract_uri(address)
        .await
        .map_err(|err| MetadataError::Rpc(format!("{:#}", err)))?;
    if uri.trim().is_empty() {
        return Err(MetadataError::MissingUri);
    }

    let url = gateway_url(&uri, gateway)?;
    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|err| MetadataError::Gateway(err.to_string()))?;
    if !response.status().is_success() {
        return Err(MetadataError::Gateway(format!(
            "status {} from {}",
            response.status(),
            url
        )));
    }
    let document = response
        .json::<serde_json::Value>()
        .await
        .map_err(|err| MetadataError::Invalid(err.to_string()))?;
    let metadata = metadata_from_document(&document)?;
    Ok((uri, metadata))
}

/// Pull the fields we show out of a loosely-shaped metadata document.
/// Gateways serve whatever the deployer uploaded; names are sometimes
/// numbers and unknown fields are common.
fn metadata_from_document(document: &serde_json::Value) -> Result<ContractMetadata, MetadataError> {
    let object = document
        .as_object()
        .ok_or_else(|| MetadataError::Invalid("metadata document is not a JSON object".into()))?;
    let text = |key: &str| match object.get(key) {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Ok(ContractMetadata {
        name: text("name"),
        description: text("description"),
        image: text("image"),
    })
}

/// Map a metadata URI onto a fetchable URL.
fn gateway_url(uri: &str, gateway: &str) -> Result<String, MetadataError> {
    if let Some(path) = uri.strip_prefix("ipfs://") {
        let path = path.strip_prefix("ipfs/").unwrap_or(path);
        Ok(format!("{}{}", gateway, path))
    } else if uri.starts_with("http://") || uri.starts_with("https://") {
        Ok(uri.to_string())
    } else {
        Err(MetadataError::Invalid(format!(
            "unsupported uri scheme: {}",
            uri
        )))
    }
}

/// Enumerate every requested role's membership on a contract.
async fn enumerate_roles(
    chain: Chain,
    existing: Option<Arc<dyn ChainClient>>,
    endpoint: ProviderConfig,
    address: Address,
    roles: Vec<Role>,
    task_tx: UnboundedSender<TaskResult>,
) {
    let (client, fresh) = match resolve_client(existing, endpoint).await {
        Ok(pair) => pair,
        Err(message) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::RolesFailed {
                chain,
                address,
                message,
            }));
            return;
        }
    };
    if fresh {
        let _ = task_tx.send(TaskResult::Connected {
            chain,
            client: Arc::clone(&client),
        });
    }

    let mut members = Vec::with_capacity(roles.len());
    for role in roles {
        match client.role_members(address, role.hash()).await {
            Ok(accounts) => members.push((role, accounts)),
            Err(err) => {
                let _ = task_tx.send(TaskResult::Event(RuntimeEvent::RolesFailed {
                    chain,
                    address,
                    message: format!("{} role: {:#}", role.name(), err),
                }));
                return;
            }
        }
    }

    let _ = task_tx.send(TaskResult::Event(RuntimeEvent::RolesReady {
        chain,
        address,
        members,
    }));
}

/// First node-managed account, used as the sender for mutations.
async fn mutation_account(client: &dyn ChainClient) -> Result<Address, String> {
    match client.accounts().await {
        Ok(accounts) => accounts
            .first()
            .copied()
            .ok_or_else(|| "node manages no accounts".to_string()),
        Err(err) => Err(format!("{:#}", err)),
    }
}

/// Submit a permission diff as individual grant/revoke transactions.
#[allow(clippy::too_many_arguments)]
async fn apply_role_changes(
    chain: Chain,
    existing: Option<Arc<dyn ChainClient>>,
    endpoint: ProviderConfig,
    address: Address,
    grants: Vec<(Role, Address)>,
    revokes: Vec<(Role, Address)>,
    task_tx: UnboundedSender<TaskResult>,
) {
    let (client, fresh) = match resolve_client(existing, endpoint).await {
        Ok(pair) => pair,
        Err(message) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::MutationFailed {
                action: "update permissions".to_string(),
                message,
            }));
            return;
        }
    };
    if fresh {
        let _ = task_tx.send(TaskResult::Connected {
            chain,
            client: Arc::clone(&client),
        });
    }

    let from = match mutation_account(client.as_ref()).await {
        Ok(from) => from,
        Err(message) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::MutationFailed {
                action: "update permissions".to_string(),
                message,
            }));
            return;
        }
    };

    let granted = grants.len();
    let revoked = revokes.len();
    for (role, member) in grants {
        if let Err(err) = client.grant_role(from, address, role.hash(), member).await {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::MutationFailed {
                action: format!("grant {} to {}", role.name(), member),
                message: format!("{:#}", err),
            }));
            return;
        }
    }
    for (role, member) in revokes {
        if let Err(err) = client.revoke_role(from, address, role.hash(), member).await {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::MutationFailed {
                action: format!("revoke {} from {}", role.name(), member),
                message: format!("{:#}", err),
            }));
            return;
        }
    }

    let _ = task_tx.send(TaskResult::Event(RuntimeEvent::RolesUpdated {
        chain,
        address,
        granted,
        revoked,
    }));
}

/// Submit a delayed-reveal transaction for one batch.
async fn reveal_batch(
    chain: Chain,
    existing: Option<Arc<dyn ChainClient>>,
    endpoint: ProviderConfig,
    address: Address,
    batch: u64,
    password: String,
    task_tx: UnboundedSender<TaskResult>,
) {
    let (client, fresh) = match resolve_client(existing, endpoint).await {
        Ok(pair) => pair,
        Err(message) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::MutationFailed {
                action: "reveal batch".to_string(),
                message,
            }));
            return;
        }
    };
    if fresh {
        let _ = task_tx.send(TaskResult::Connected {
            chain,
            client: Arc::clone(&client),
        });
    }

    let from = match mutation_account(client.as_ref()).await {
        Ok(from) => from,
        Err(message) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::MutationFailed {
                action: "reveal batch".to_string(),
                message,
            }));
            return;
        }
    };

    let key = Bytes::from(password.into_bytes());
    match client
        .reveal_batch(from, address, U256::from(batch), key)
        .await
    {
        Ok(_) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::Revealed {
                chain,
                address,
                batch,
            }));
        }
        Err(err) => {
            let _ = task_tx.send(TaskResult::Event(RuntimeEvent::MutationFailed {
                action: format!("reveal batch {}", batch),
                message: format!("{:#}", err),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_url_resolution() {
        let gateway = "https://ipfs.io/ipfs/";
        assert_eq!(
            gateway_url("ipfs://QmHash/0", gateway).unwrap(),
            "https://ipfs.io/ipfs/QmHash/0"
        );
        // Some URIs double up the ipfs path segment.
        assert_eq!(
            gateway_url("ipfs://ipfs/QmHash", gateway).unwrap(),
            "https://ipfs.io/ipfs/QmHash"
        );
        assert_eq!(
            gateway_url("https://example.org/meta.json", gateway).unwrap(),
            "https://example.org/meta.json"
        );
        assert!(gateway_url("ar://tx", gateway).is_err());
    }

    #[test]
    fn test_metadata_document_tolerates_loose_shapes() {
        let full: serde_json::Value = serde_json::json!({
            "name": "My Drop",
            "description": "desc",
            "image": "ipfs://QmImg",
            "seller_fee_basis_points": 250
        });
        let meta = metadata_from_document(&full).unwrap();
        assert_eq!(meta.name.as_deref(), Some("My Drop"));
        assert_eq!(meta.image.as_deref(), Some("ipfs://QmImg"));

        // Numeric name still renders; missing fields stay None.
        let odd: serde_json::Value = serde_json::json!({ "name": 42 });
        let meta = metadata_from_document(&odd).unwrap();
        assert_eq!(meta.name.as_deref(), Some("42"));
        assert!(meta.description.is_none());

        assert!(metadata_from_document(&serde_json::json!("just a string")).is_err());
        assert!(metadata_from_document(&serde_json::json!(["a", "b"])).is_err());
    }
}
