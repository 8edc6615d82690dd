//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI thread sends `RuntimeCommand`s and drains `RuntimeEvent`s each
//! tick; the worker thread owns the Tokio runtime and every network
//! connection. Commands that belong to a fetch round carry a generation
//! number so the UI can discard results that arrive after a wallet
//! switch or refresh.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use alloy_primitives::Address;
use tokio::runtime::Runtime;

use crate::core::chain::Chain;
use crate::core::contract::{ContractEntry, Role};
use crate::domain::metadata::ContractMetadata;
use crate::infrastructure::ethereum::ProviderConfig;
use crate::infrastructure::runtime::worker::run_async_worker;

/// Everything the worker needs to reach the configured chains
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Endpoint per chain; chains without one are never queried
    pub endpoints: BTreeMap<Chain, ProviderConfig>,
    /// Deploy registry contract per chain
    pub registries: BTreeMap<Chain, Address>,
    /// IPFS gateway prefix for metadata documents, ends with '/'
    pub gateway: String,
    /// SQLite metadata cache; None disables persistence
    pub cache_path: Option<PathBuf>,
}

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Query every configured chain's registry for a wallet's contracts
    FetchDeployments { generation: u64, wallet: Address },
    /// Resolve one contract's metadata document; `force` bypasses the
    /// persistent cache (manual refresh)
    FetchMetadata {
        generation: u64,
        chain: Chain,
        address: Address,
        force: bool,
    },
    /// Enumerate role membership on a contract
    FetchRoles {
        chain: Chain,
        address: Address,
        roles: Vec<Role>,
    },
    /// Apply a permission diff as grant/revoke transactions
    ApplyRoleChanges {
        chain: Chain,
        address: Address,
        grants: Vec<(Role, Address)>,
        revokes: Vec<(Role, Address)>,
    },
    /// Reveal a delayed-reveal batch with the given password
    Reveal {
        chain: Chain,
        address: Address,
        batch: u64,
        password: String,
    },
    /// Add or replace a chain endpoint at runtime
    Connect {
        chain: Chain,
        endpoint: ProviderConfig,
    },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Successfully connected to a chain's endpoint
    ChainConnected { chain: Chain, endpoint: String },
    /// One chain's registry listing arrived
    Deployments {
        generation: u64,
        chain: Chain,
        entries: Vec<ContractEntry>,
    },
    /// One chain's registry query failed
    ChainFailed {
        generation: u64,
        chain: Chain,
        message: String,
    },
    /// A contract's metadata document resolved
    MetadataReady {
        generation: u64,
        chain: Chain,
        address: Address,
        metadata: ContractMetadata,
    },
    /// A contract's metadata resolution failed
    MetadataFailed {
        generation: u64,
        chain: Chain,
        address: Address,
        message: String,
    },
    /// Role membership snapshot for a contract
    RolesReady {
        chain: Chain,
        address: Address,
        members: Vec<(Role, Vec<Address>)>,
    },
    /// Role membership enumeration failed
    RolesFailed {
        chain: Chain,
        address: Address,
        message: String,
    },
    /// A permission diff landed on chain
    RolesUpdated {
        chain: Chain,
        address: Address,
        granted: usize,
        revoked: usize,
    },
    /// A reveal transaction landed
    Revealed {
        chain: Chain,
        address: Address,
        batch: u64,
    },
    /// A state-changing call failed
    MutationFailed { action: String, message: String },
    /// Error occurred
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Create a new runtime bridge for the given worker configuration
    pub fn new(config: WorkerConfig) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        // Spawn the worker thread with its own Tokio runtime
        thread::spawn(move || {
            let rt = Runtime::new().expect("Failed to create Tokio runtime");
            rt.block_on(async {
                if let Err(err) = run_async_worker(config, cmd_rx, evt_tx.clone()).await {
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!("Worker exited: {:#}", err),
                    });
                }
            });
        });

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Try to receive a single event (non-blocking)
    pub fn try_recv(&self) -> Option<RuntimeEvent> {
        self.evt_rx.try_recv().ok()
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        // Try to send shutdown command
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
