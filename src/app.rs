use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use alloy_primitives::Address;

use crate::config::Config;
use crate::core::route::{contract_path, deploy_path};
use crate::core::{
    parse_command, Action, Chain, Command, Context, ContractEntry, FilterState, NavigateTarget,
    NotifyLevel, PromptKind, Selected, WalletTarget,
};
use crate::domain::registry::{aggregate, settled_count, ChainQuery};
use crate::domain::{ContractMetadata, MetadataCache};
use crate::infrastructure::runtime::{RuntimeCommand, RuntimeEvent};
use crate::modules::export::ExportRecord;
use crate::modules::{
    CurrencyPicker, DeployPicker, MediaInspector, PermissionEditor, RevealDialog,
};

/// Views on the stack: the cross-chain table and the per-contract
/// detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Registry,
    ContractDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Prompt(PromptKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Mock,
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

/// Column with focus inside the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Types,
    Chains,
}

#[derive(Debug, Clone)]
pub struct FilterPanel {
    pub column: FilterColumn,
    pub cursor: usize,
}

impl FilterPanel {
    fn new() -> Self {
        Self {
            column: FilterColumn::Types,
            cursor: 0,
        }
    }
}

/// The interactive overlay currently on top of the table, if any.
pub enum Overlay {
    Deploy(DeployPicker),
    Currency(CurrencyPicker),
    Permissions(PermissionEditor),
    Reveal(RevealDialog),
    Media(MediaInspector),
}

impl Overlay {
    pub fn as_module(&self) -> &dyn crate::core::Module {
        match self {
            Overlay::Deploy(m) => m,
            Overlay::Currency(m) => m,
            Overlay::Permissions(m) => m,
            Overlay::Reveal(m) => m,
            Overlay::Media(m) => m,
        }
    }

    pub fn as_module_mut(&mut self) -> &mut dyn crate::core::Module {
        match self {
            Overlay::Deploy(m) => m,
            Overlay::Currency(m) => m,
            Overlay::Permissions(m) => m,
            Overlay::Reveal(m) => m,
            Overlay::Media(m) => m,
        }
    }
}

pub struct App {
    /// Shared context for modules
    pub ctx: Context,
    pub config: Config,
    pub data_mode: DataMode,
    pub view_stack: Vec<View>,
    pub input_mode: InputMode,

    /// Wallet the listing is scoped to
    pub wallet: WalletTarget,
    /// Address the "dashboard" placeholder resolves to
    pub default_wallet: Option<Address>,
    /// Fetch round counter; events from older rounds are discarded
    pub generation: u64,

    /// Per-chain listing state, one slot per supported chain
    pub chain_queries: BTreeMap<Chain, ChainQuery>,
    /// The cross-chain aggregate in fixed chain order
    pub rows: Vec<ContractEntry>,
    pub filter: FilterState,
    /// Cursor into the filtered row indices
    pub selected_row: usize,
    pub metadata: MetadataCache,

    /// Chains that have an endpoint configured
    pub configured: BTreeSet<Chain>,
    /// Endpoint label per chain whose probe succeeded
    pub connected: BTreeMap<Chain, String>,
    /// Chosen listing currency per contract
    pub currency_choices: BTreeMap<(Chain, Address), (Address, String)>,

    pub overlay: Option<Overlay>,
    pub filter_panel: Option<FilterPanel>,
    pub help_open: bool,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,

    /// Contract the currency picker was opened for
    currency_target: Option<(Chain, Address)>,
    /// Generation whose metadata fetches bypass the persistent cache
    force_generation: Option<u64>,
    round_summary_sent: bool,
    pending_commands: Vec<RuntimeCommand>,
    pending_copy: Option<String>,
    /// Unresolved mock rows, settled progressively on ticks
    mock_meta_queue: Vec<(Chain, Address)>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut chain_queries = BTreeMap::new();
        for chain in Chain::ALL {
            chain_queries.insert(chain, ChainQuery::Disabled);
        }
        Self {
            ctx: Context::new(),
            config,
            data_mode: DataMode::Mock,
            view_stack: vec![View::Registry],
            input_mode: InputMode::Normal,
            wallet: WalletTarget::Placeholder,
            default_wallet: None,
            generation: 0,
            chain_queries,
            rows: Vec::new(),
            filter: FilterState::default(),
            selected_row: 0,
            metadata: MetadataCache::new(),
            configured: BTreeSet::new(),
            connected: BTreeMap::new(),
            currency_choices: BTreeMap::new(),
            overlay: None,
            filter_panel: None,
            help_open: false,
            command: CommandBar::default(),
            status: None,
            should_quit: false,
            currency_target: None,
            force_generation: None,
            round_summary_sent: false,
            pending_commands: Vec::new(),
            pending_copy: None,
            mock_meta_queue: Vec::new(),
        }
    }

    /// Kick off the first fetch round (or seed mock data).
    pub fn start(&mut self) {
        match self.data_mode {
            DataMode::Mock => {
                self.seed_mock();
                self.set_status(
                    "No endpoints configured, showing mock data",
                    StatusLevel::Warn,
                );
            }
            DataMode::Rpc => self.begin_fetch_round(),
        }
    }

    pub fn resolved_wallet(&self) -> Option<Address> {
        self.wallet.resolve(self.default_wallet)
    }

    /// Sync context with app state
    pub fn sync_context(&mut self) {
        self.ctx.wallet_segment = self.wallet.segment();
        self.ctx.selected = match self.selected_entry() {
            Some(entry) => Selected::Contract(entry),
            None => Selected::None,
        };
    }

    pub fn current_view(&self) -> View {
        *self.view_stack.last().unwrap_or(&View::Registry)
    }

    pub fn push_view(&mut self, view: View) {
        self.view_stack.push(view);
    }

    pub fn pop_view(&mut self) {
        if self.view_stack.len() > 1 {
            self.view_stack.pop();
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
        if self.data_mode == DataMode::Mock {
            self.resolve_mock_metadata(2);
        }
        self.clamp_selection();
    }

    // ------------------------------------------------------------------
    // Fetch rounds

    /// Reset per-chain state and issue a listing query for the current
    /// wallet. Bumps the generation so older results are discarded.
    fn begin_fetch_round(&mut self) {
        self.generation += 1;
        self.round_summary_sent = false;
        self.rows.clear();
        for chain in Chain::ALL {
            let state = if self.configured.contains(&chain) {
                ChainQuery::Pending
            } else {
                ChainQuery::Disabled
            };
            self.chain_queries.insert(chain, state);
        }
        self.clamp_selection();

        if self.data_mode == DataMode::Mock {
            self.seed_mock();
            return;
        }
        let Some(wallet) = self.resolved_wallet() else {
            // Nothing to query; the table shows the connect hint.
            for chain in Chain::ALL {
                self.chain_queries.insert(chain, ChainQuery::Disabled);
            }
            return;
        };
        self.pending_commands.push(RuntimeCommand::FetchDeployments {
            generation: self.generation,
            wallet,
        });
    }

    pub fn set_wallet(&mut self, target: WalletTarget) {
        self.wallet = target;
        self.metadata.invalidate_all();
        self.mock_meta_queue.clear();
        self.begin_fetch_round();
        self.set_status(format!("Wallet set to {}", target.segment()), StatusLevel::Info);
    }

    /// Manual refresh: drop every cache layer and refetch, bypassing
    /// the persistent metadata store.
    pub fn refresh(&mut self) {
        self.metadata.invalidate_all();
        self.mock_meta_queue.clear();
        self.begin_fetch_round();
        self.force_generation = Some(self.generation);
        match self.data_mode {
            DataMode::Mock => self.set_status("Refreshed mock data", StatusLevel::Info),
            DataMode::Rpc => self.set_status("Refreshing from chain ...", StatusLevel::Info),
        }
    }

    fn queue_metadata(&mut self, entry: &ContractEntry) {
        let key = entry.key();
        if !self.metadata.note_loading(key) {
            return;
        }
        match self.data_mode {
            DataMode::Rpc => self.pending_commands.push(RuntimeCommand::FetchMetadata {
                generation: self.generation,
                chain: entry.chain,
                address: entry.address,
                force: self.force_generation == Some(self.generation),
            }),
            DataMode::Mock => self.mock_meta_queue.push(key),
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows = aggregate(&self.chain_queries);
        self.clamp_selection();
    }

    fn announce_round_if_settled(&mut self) {
        if self.round_summary_sent || self.configured.is_empty() {
            return;
        }
        let settled = settled_count(&self.chain_queries);
        if settled < self.configured.len() {
            return;
        }
        let ready = self
            .chain_queries
            .values()
            .filter(|q| q.is_ready())
            .count();
        self.round_summary_sent = true;
        self.set_status(
            format!("{} contracts across {} chains", self.rows.len(), ready),
            StatusLevel::Info,
        );
    }

    // ------------------------------------------------------------------
    // Worker event ingestion

    pub fn apply_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::ChainConnected { chain, endpoint } => {
                self.connected.insert(chain, endpoint);
            }
            RuntimeEvent::Deployments {
                generation,
                chain,
                entries,
            } => {
                if generation != self.generation {
                    return;
                }
                for entry in &entries {
                    self.queue_metadata(entry);
                }
                self.chain_queries.insert(chain, ChainQuery::Ready(entries));
                self.rebuild_rows();
                self.announce_round_if_settled();
            }
            RuntimeEvent::ChainFailed {
                generation,
                chain,
                message,
            } => {
                if generation != self.generation {
                    return;
                }
                self.set_status(format!("{}: {}", chain.name(), message), StatusLevel::Warn);
                self.chain_queries.insert(chain, ChainQuery::Failed(message));
                self.rebuild_rows();
                self.announce_round_if_settled();
            }
            RuntimeEvent::MetadataReady {
                generation,
                chain,
                address,
                metadata,
            } => {
                if generation != self.generation {
                    return;
                }
                self.metadata.insert_ready((chain, address), metadata);
            }
            RuntimeEvent::MetadataFailed {
                generation,
                chain,
                address,
                message,
            } => {
                if generation != self.generation {
                    return;
                }
                self.metadata.insert_failed((chain, address), message);
            }
            RuntimeEvent::RolesReady {
                chain,
                address,
                members,
            } => {
                if let Some(Overlay::Permissions(editor)) = self.overlay.as_mut() {
                    if editor.entry().key() == (chain, address) {
                        editor.apply_members(members);
                    }
                }
            }
            RuntimeEvent::RolesFailed {
                chain,
                address,
                message,
            } => {
                if let Some(Overlay::Permissions(editor)) = self.overlay.as_mut() {
                    if editor.entry().key() == (chain, address) {
                        editor.apply_failure(message);
                    }
                }
            }
            RuntimeEvent::RolesUpdated { chain, address, .. } => {
                if let Some(Overlay::Permissions(editor)) = self.overlay.as_mut() {
                    if editor.entry().key() == (chain, address) {
                        editor.confirm_saved();
                    }
                }
                self.set_status("Permissions updated", StatusLevel::Info);
            }
            RuntimeEvent::Revealed { .. } => {
                if matches!(self.overlay, Some(Overlay::Reveal(_))) {
                    self.overlay = None;
                }
                self.set_status("Batch revealed successfully", StatusLevel::Info);
            }
            RuntimeEvent::MutationFailed { action, message } => match self.overlay.as_mut() {
                Some(Overlay::Reveal(dialog)) => {
                    dialog.submit_failed();
                    self.set_status(
                        format!("Error revealing batch upload: {}", message),
                        StatusLevel::Error,
                    );
                }
                Some(Overlay::Permissions(editor)) => {
                    editor.submit_failed();
                    self.set_status(
                        format!("Failed to update permissions: {}", message),
                        StatusLevel::Error,
                    );
                }
                _ => self.set_status(format!("{} failed: {}", action, message), StatusLevel::Error),
            },
            RuntimeEvent::Error { message } => {
                self.set_status(message, StatusLevel::Error);
            }
        }
    }

    // ------------------------------------------------------------------
    // Table state

    /// Indices into `rows` that pass the filter, in order.
    pub fn filtered_rows(&self) -> Vec<usize> {
        self.filter
            .row_indices(&self.rows, |e| self.metadata.resolved_name(e.key()))
    }

    pub fn selected_entry(&self) -> Option<ContractEntry> {
        let indices = self.filtered_rows();
        indices
            .get(self.selected_row)
            .map(|&idx| self.rows[idx])
    }

    pub fn move_selection_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.filtered_rows().len();
        if len > 0 && self.selected_row + 1 < len {
            self.selected_row += 1;
        }
    }

    pub fn go_to_top(&mut self) {
        self.selected_row = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected_row = self.filtered_rows().len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_rows().len();
        if len == 0 {
            self.selected_row = 0;
        } else if self.selected_row >= len {
            self.selected_row = len - 1;
        }
    }

    // ------------------------------------------------------------------
    // Command and prompt input

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn enter_prompt(&mut self, kind: PromptKind) {
        self.input_mode = InputMode::Prompt(kind);
        self.command.input.clear();
    }

    pub fn exit_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }
        let cmd = parse_command(&input);
        self.command.last = Some(input);
        self.exit_command();
        let action = self.execute_command(&cmd);
        self.apply_action(action);
    }

    /// Handle Enter in a prompt. Invalid input keeps the prompt open so
    /// the value stays editable.
    pub fn apply_prompt(&mut self, kind: PromptKind) {
        let input = self.command.input.trim().to_string();
        match kind {
            PromptKind::Wallet => match WalletTarget::parse(&input) {
                Some(target) => {
                    self.exit_prompt();
                    self.set_wallet(target);
                }
                None => {
                    self.set_status(
                        "Invalid wallet: use a 0x address or 'dashboard'",
                        StatusLevel::Warn,
                    );
                }
            },
            PromptKind::RoleMember { role } => {
                let Ok(member) = input.parse::<Address>() else {
                    self.set_status("Invalid address", StatusLevel::Warn);
                    return;
                };
                self.exit_prompt();
                if let Some(Overlay::Permissions(editor)) = self.overlay.as_mut() {
                    match editor.add_member(role, member) {
                        Ok(()) => self.set_status(
                            format!("Added {} to {} (unsaved)", member, role.name()),
                            StatusLevel::Info,
                        ),
                        Err(err) => self.set_status(err, StatusLevel::Warn),
                    }
                }
            }
            PromptKind::MediaPath => {
                if input.is_empty() {
                    self.exit_prompt();
                    return;
                }
                if self.inspect_media(&input) {
                    self.exit_prompt();
                }
            }
        }
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::Quit => Action::Quit,
            Command::Help => {
                self.help_open = !self.help_open;
                Action::None
            }
            Command::Refresh => {
                self.refresh();
                Action::None
            }

            Command::Wallet(None) => Action::OpenPrompt(PromptKind::Wallet),
            Command::Wallet(Some(arg)) => match WalletTarget::parse(arg) {
                Some(target) => {
                    self.set_wallet(target);
                    Action::None
                }
                None => Action::Notify(
                    format!("Invalid wallet: {}", arg),
                    NotifyLevel::Warn,
                ),
            },

            Command::Filter(None) => {
                self.open_filter_panel();
                Action::None
            }
            Command::Filter(Some(spec)) => match self.filter.apply_spec(spec) {
                Ok(()) => {
                    self.clamp_selection();
                    let shown = self.filtered_rows().len();
                    Action::Notify(
                        format!("Filter applied, {} of {} shown", shown, self.rows.len()),
                        NotifyLevel::Info,
                    )
                }
                Err(err) => Action::Notify(err, NotifyLevel::Warn),
            },

            Command::Copy => self.copy_selected_address(),
            Command::Export => self.export_visible(),
            Command::Deploy(None) => {
                self.overlay = Some(Overlay::Deploy(DeployPicker::new()));
                Action::None
            }
            Command::Deploy(Some(slug)) => match Chain::from_slug(slug) {
                Some(chain) => Action::Navigate(NavigateTarget::Deploy(chain)),
                None => Action::Notify(format!("Unknown chain: {}", slug), NotifyLevel::Warn),
            },

            Command::Permissions => self.open_permissions(),
            Command::Currency => self.open_currency(),
            Command::Reveal(batch) => self.open_reveal(batch.as_deref()),
            Command::Media(None) => Action::OpenPrompt(PromptKind::MediaPath),
            Command::Media(Some(path)) => {
                self.inspect_media(path);
                Action::None
            }

            Command::Connect(spec) => self.connect_endpoint(spec),

            Command::Unknown(s) => {
                Action::Notify(format!("Unknown command: {}", s), NotifyLevel::Warn)
            }
        }
    }

    /// Apply an action returned by a command or module
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(target) => match target {
                NavigateTarget::Back => {
                    if self.overlay.is_some() {
                        self.overlay = None;
                    } else {
                        self.pop_view();
                    }
                }
                NavigateTarget::Registry => {
                    self.view_stack = vec![View::Registry];
                }
                NavigateTarget::Detail => {
                    if self.selected_entry().is_some()
                        && self.current_view() != View::ContractDetail
                    {
                        self.push_view(View::ContractDetail);
                    }
                }
                NavigateTarget::Deploy(chain) => {
                    let route = deploy_path(&self.wallet.segment(), chain);
                    self.overlay = None;
                    self.pending_copy = Some(route.clone());
                    self.set_status(
                        format!("Deploy route copied: {}", route),
                        StatusLevel::Info,
                    );
                }
            },
            Action::Copy(text) => {
                self.pending_copy = Some(text);
                self.set_status("Copied to clipboard", StatusLevel::Info);
            }
            Action::Notify(msg, level) => {
                let level = match level {
                    NotifyLevel::Info => StatusLevel::Info,
                    NotifyLevel::Warn => StatusLevel::Warn,
                    NotifyLevel::Error => StatusLevel::Error,
                };
                self.set_status(msg, level);
            }
            Action::OpenPrompt(kind) => self.enter_prompt(kind),
            Action::CloseOverlay => self.overlay = None,
            Action::SubmitPermissions => self.submit_permissions(),
            Action::SubmitReveal { batch, password } => self.submit_reveal(batch, password),
            Action::SelectCurrency {
                address, label, ..
            } => {
                if let Some(key) = self.currency_target.take() {
                    self.currency_choices.insert(key, (address, label.clone()));
                }
                self.overlay = None;
                self.set_status(format!("Currency set to {}", label), StatusLevel::Info);
            }
            Action::Quit => self.should_quit = true,
        }
    }

    // ------------------------------------------------------------------
    // Row actions and overlays

    pub fn copy_selected_address(&mut self) -> Action {
        match self.selected_entry() {
            Some(entry) => Action::Copy(entry.address.to_string()),
            None => Action::Notify("No contract selected".to_string(), NotifyLevel::Warn),
        }
    }

    pub fn copy_selected_route(&mut self) -> Action {
        match self.selected_entry() {
            Some(entry) => Action::Copy(contract_path(&self.wallet.segment(), &entry)),
            None => Action::Notify("No contract selected".to_string(), NotifyLevel::Warn),
        }
    }

    pub fn export_visible(&mut self) -> Action {
        let segment = self.wallet.segment();
        let records: Vec<ExportRecord> = self
            .filtered_rows()
            .into_iter()
            .map(|idx| {
                let entry = &self.rows[idx];
                ExportRecord {
                    name: self.metadata.display_name(entry),
                    contract_type: entry.contract_type.display_name().to_string(),
                    chain: entry.chain,
                    address: format!("{:#x}", entry.address),
                    route: contract_path(&segment, entry),
                }
            })
            .collect();
        crate::modules::export::export_contracts(&records)
    }

    pub fn open_permissions(&mut self) -> Action {
        let Some(entry) = self.selected_entry() else {
            return Action::Notify("No contract selected".to_string(), NotifyLevel::Warn);
        };
        let name = self.metadata.display_name(&entry);
        let mut editor = PermissionEditor::new(entry, name);
        match self.data_mode {
            DataMode::Rpc => self.pending_commands.push(RuntimeCommand::FetchRoles {
                chain: entry.chain,
                address: entry.address,
                roles: entry.contract_type.roles().to_vec(),
            }),
            DataMode::Mock => editor.apply_members(mock_role_members(&entry)),
        }
        self.overlay = Some(Overlay::Permissions(editor));
        Action::None
    }

    pub fn open_currency(&mut self) -> Action {
        let Some(entry) = self.selected_entry() else {
            return Action::Notify("No contract selected".to_string(), NotifyLevel::Warn);
        };
        self.currency_target = Some(entry.key());
        self.overlay = Some(Overlay::Currency(CurrencyPicker::new(
            entry.chain,
            &self.config.currencies,
        )));
        Action::None
    }

    pub fn open_reveal(&mut self, batch: Option<&str>) -> Action {
        let Some(entry) = self.selected_entry() else {
            return Action::Notify("No contract selected".to_string(), NotifyLevel::Warn);
        };
        if !entry.contract_type.supports_reveal() {
            return Action::Notify(
                format!(
                    "{} contracts have no delayed-reveal batches",
                    entry.contract_type.display_name()
                ),
                NotifyLevel::Warn,
            );
        }
        let name = self.metadata.display_name(&entry);
        let mut dialog = RevealDialog::new(entry, name);
        if let Some(batch) = batch {
            dialog.prefill_batch(batch);
        }
        self.overlay = Some(Overlay::Reveal(dialog));
        Action::None
    }

    pub fn open_deploy(&mut self) {
        self.overlay = Some(Overlay::Deploy(DeployPicker::new()));
    }

    /// Scan a path for the media inspector. Returns false when the path
    /// cannot be read, leaving the prompt open.
    pub fn inspect_media(&mut self, path: &str) -> bool {
        match crate::modules::media::scan(std::path::Path::new(path)) {
            Ok(report) => {
                self.overlay = Some(Overlay::Media(MediaInspector::new(report)));
                true
            }
            Err(err) => {
                self.set_status(format!("{:#}", err), StatusLevel::Warn);
                false
            }
        }
    }

    fn submit_permissions(&mut self) {
        let Some(Overlay::Permissions(editor)) = self.overlay.as_mut() else {
            return;
        };
        let entry = *editor.entry();
        let (grants, revokes) = editor.diff();
        if grants.is_empty() && revokes.is_empty() {
            return;
        }
        match self.data_mode {
            DataMode::Rpc => {
                editor.mark_saving();
                self.pending_commands.push(RuntimeCommand::ApplyRoleChanges {
                    chain: entry.chain,
                    address: entry.address,
                    grants,
                    revokes,
                });
            }
            DataMode::Mock => {
                editor.confirm_saved();
                self.set_status("Permissions updated", StatusLevel::Info);
            }
        }
    }

    fn submit_reveal(&mut self, batch: u64, password: String) {
        let Some(Overlay::Reveal(dialog)) = self.overlay.as_mut() else {
            return;
        };
        let entry = *dialog.entry();
        match self.data_mode {
            DataMode::Rpc => {
                dialog.mark_submitting();
                self.pending_commands.push(RuntimeCommand::Reveal {
                    chain: entry.chain,
                    address: entry.address,
                    batch,
                    password,
                });
            }
            DataMode::Mock => {
                self.overlay = None;
                self.set_status("Batch revealed successfully", StatusLevel::Info);
            }
        }
    }

    fn connect_endpoint(&mut self, spec: &str) -> Action {
        if self.data_mode == DataMode::Mock {
            return Action::Notify(
                "Endpoints can only be added when started with RPC endpoints".to_string(),
                NotifyLevel::Warn,
            );
        }
        let Some((chain_part, url)) = spec.split_once('=') else {
            return Action::Notify(
                "usage: :connect <chain>=<endpoint>".to_string(),
                NotifyLevel::Warn,
            );
        };
        let Some(chain) = Chain::from_slug(chain_part) else {
            return Action::Notify(
                format!("Unknown chain: {}", chain_part),
                NotifyLevel::Warn,
            );
        };
        let endpoint = match crate::infrastructure::ProviderConfig::parse(url.trim()) {
            Ok(endpoint) => endpoint,
            Err(err) => return Action::Notify(format!("{:#}", err), NotifyLevel::Warn),
        };
        self.configured.insert(chain);
        self.connected.remove(&chain);
        self.chain_queries.insert(chain, ChainQuery::Pending);
        self.pending_commands
            .push(RuntimeCommand::Connect { chain, endpoint });
        if let Some(wallet) = self.resolved_wallet() {
            self.pending_commands.push(RuntimeCommand::FetchDeployments {
                generation: self.generation,
                wallet,
            });
        }
        Action::Notify(
            format!("Connecting to {} ...", chain.name()),
            NotifyLevel::Info,
        )
    }

    // ------------------------------------------------------------------
    // Filter panel

    pub fn open_filter_panel(&mut self) {
        self.filter_panel = Some(FilterPanel::new());
    }

    pub fn handle_filter_panel_key(&mut self, code: crossterm::event::KeyCode) {
        use crossterm::event::KeyCode;
        let Some(panel) = self.filter_panel.as_mut() else {
            return;
        };
        let column_len = match panel.column {
            FilterColumn::Types => crate::core::ContractType::ALL.len(),
            FilterColumn::Chains => Chain::ALL.len(),
        };
        match code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => {
                self.filter_panel = None;
            }
            KeyCode::Tab | KeyCode::Left | KeyCode::Right | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                panel.column = match panel.column {
                    FilterColumn::Types => FilterColumn::Chains,
                    FilterColumn::Chains => FilterColumn::Types,
                };
                panel.cursor = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if panel.cursor + 1 < column_len {
                    panel.cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                panel.cursor = panel.cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                match panel.column {
                    FilterColumn::Types => {
                        let ty = crate::core::ContractType::ALL[panel.cursor];
                        self.filter.toggle_type(ty);
                    }
                    FilterColumn::Chains => {
                        let chain = Chain::ALL[panel.cursor];
                        self.filter.toggle_chain(chain);
                    }
                }
                self.clamp_selection();
            }
            KeyCode::Char('a') => {
                match panel.column {
                    FilterColumn::Types => self.filter.select_all_types(),
                    FilterColumn::Chains => self.filter.select_all_chains(),
                }
                self.clamp_selection();
            }
            KeyCode::Char('n') => {
                match panel.column {
                    FilterColumn::Types => self.filter.clear_types(),
                    FilterColumn::Chains => self.filter.clear_chains(),
                }
                self.clamp_selection();
            }
            KeyCode::Char('r') => {
                self.filter.reset();
                self.clamp_selection();
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Main-loop takers

    pub fn take_runtime_commands(&mut self) -> Vec<RuntimeCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    pub fn take_copy(&mut self) -> Option<String> {
        self.pending_copy.take()
    }

    // ------------------------------------------------------------------
    // Mock mode

    fn seed_mock(&mut self) {
        use crate::core::ContractType;

        let counts: [(Chain, usize); 7] = [
            (Chain::Mainnet, 3),
            (Chain::Polygon, 4),
            (Chain::Avalanche, 2),
            (Chain::Fantom, 1),
            (Chain::Rinkeby, 2),
            (Chain::Goerli, 1),
            (Chain::Mumbai, 3),
        ];
        for (ci, (chain, count)) in counts.into_iter().enumerate() {
            let mut entries = Vec::new();
            for i in 0..count {
                let byte = (ci * 16 + i + 1) as u8;
                let ty = ContractType::ALL[(ci + i) % ContractType::ALL.len()];
                entries.push(ContractEntry::new(chain, Address::repeat_byte(byte), ty));
            }
            self.chain_queries.insert(chain, ChainQuery::Ready(entries));
        }
        self.rebuild_rows();
        for entry in self.rows.clone() {
            self.queue_metadata(&entry);
        }
    }

    /// Settle up to `limit` queued mock rows, oldest first.
    fn resolve_mock_metadata(&mut self, limit: usize) {
        let take = self.mock_meta_queue.len().min(limit);
        if take == 0 {
            return;
        }
        let keys: Vec<(Chain, Address)> = self.mock_meta_queue.drain(..take).collect();
        for key in keys {
            let seed = key.1.as_slice()[0] as u64;
            self.metadata
                .insert_ready(key, ContractMetadata::mock(seed));
        }
    }
}

/// Deterministic role membership for mock mode.
fn mock_role_members(entry: &ContractEntry) -> Vec<(crate::core::Role, Vec<Address>)> {
    let owner = Address::repeat_byte(0xA0);
    let second = Address::repeat_byte(0xB1);
    entry
        .contract_type
        .roles()
        .iter()
        .enumerate()
        .map(|(idx, role)| {
            let members = if idx == 0 {
                vec![owner]
            } else {
                vec![owner, second]
            };
            (*role, members)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ContractType, Role};
    use crate::domain::metadata::LOADING_PLACEHOLDER;

    fn mock_app() -> App {
        let mut app = App::new(Config::default());
        app.data_mode = DataMode::Mock;
        app.start();
        app
    }

    fn rpc_app() -> App {
        let mut app = App::new(Config::default());
        app.data_mode = DataMode::Rpc;
        app.default_wallet = Some(Address::repeat_byte(0xAB));
        app.configured = [Chain::Mainnet, Chain::Polygon].into_iter().collect();
        app.start();
        app
    }

    fn entries(chain: Chain, bytes: &[u8]) -> Vec<ContractEntry> {
        bytes
            .iter()
            .map(|&b| ContractEntry::new(chain, Address::repeat_byte(b), ContractType::NftDrop))
            .collect()
    }

    #[test]
    fn test_mock_seed_and_progressive_metadata() {
        let mut app = mock_app();
        assert_eq!(app.rows.len(), 16);

        let first = app.rows[0];
        assert_eq!(app.metadata.display_name(&first), LOADING_PLACEHOLDER);

        // Each tick settles a couple of rows until the queue drains.
        for _ in 0..16 {
            app.on_tick();
        }
        assert_ne!(app.metadata.display_name(&first), LOADING_PLACEHOLDER);
        assert!(app.mock_meta_queue.is_empty());
    }

    #[test]
    fn test_rpc_start_issues_fetch_round() {
        let mut app = rpc_app();
        assert_eq!(app.generation, 1);
        let commands = app.take_runtime_commands();
        assert!(matches!(
            commands.as_slice(),
            [RuntimeCommand::FetchDeployments { generation: 1, .. }]
        ));
        assert!(app.chain_queries[&Chain::Mainnet].is_pending());
        assert!(matches!(
            app.chain_queries[&Chain::Fantom],
            ChainQuery::Disabled
        ));
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut app = rpc_app();
        let stale = app.generation;
        app.refresh();
        assert_eq!(app.generation, stale + 1);

        app.apply_event(RuntimeEvent::Deployments {
            generation: stale,
            chain: Chain::Mainnet,
            entries: entries(Chain::Mainnet, &[0x01]),
        });
        assert!(app.rows.is_empty());

        app.apply_event(RuntimeEvent::Deployments {
            generation: app.generation,
            chain: Chain::Mainnet,
            entries: entries(Chain::Mainnet, &[0x02]),
        });
        assert_eq!(app.rows.len(), 1);
    }

    #[test]
    fn test_chain_failure_does_not_abort_others() {
        let mut app = rpc_app();
        let generation = app.generation;
        app.apply_event(RuntimeEvent::ChainFailed {
            generation,
            chain: Chain::Mainnet,
            message: "rpc down".to_string(),
        });
        app.apply_event(RuntimeEvent::Deployments {
            generation,
            chain: Chain::Polygon,
            entries: entries(Chain::Polygon, &[0x03, 0x04]),
        });
        assert_eq!(app.rows.len(), 2);
        assert!(app.chain_queries[&Chain::Mainnet].is_failed());
        // Both configured chains settled, so the round summary fired.
        let (text, _) = app.status_text().unwrap();
        assert!(text.contains("2 contracts"));
    }

    #[test]
    fn test_wallet_switch_invalidates_metadata() {
        let mut app = rpc_app();
        let generation = app.generation;
        app.apply_event(RuntimeEvent::Deployments {
            generation,
            chain: Chain::Mainnet,
            entries: entries(Chain::Mainnet, &[0x01]),
        });
        app.apply_event(RuntimeEvent::MetadataReady {
            generation,
            chain: Chain::Mainnet,
            address: Address::repeat_byte(0x01),
            metadata: ContractMetadata::named("My Drop"),
        });
        assert_eq!(app.metadata.len(), 1);

        app.take_runtime_commands();
        app.set_wallet(WalletTarget::Address(Address::repeat_byte(0xCD)));
        assert!(app.metadata.is_empty());
        assert!(app.rows.is_empty());
        let commands = app.take_runtime_commands();
        assert!(matches!(
            commands.as_slice(),
            [RuntimeCommand::FetchDeployments { wallet, .. }]
                if *wallet == Address::repeat_byte(0xCD)
        ));
    }

    #[test]
    fn test_metadata_force_flag_only_after_refresh() {
        let mut app = rpc_app();
        app.apply_event(RuntimeEvent::Deployments {
            generation: app.generation,
            chain: Chain::Mainnet,
            entries: entries(Chain::Mainnet, &[0x01]),
        });
        let commands = app.take_runtime_commands();
        assert!(commands.iter().any(
            |c| matches!(c, RuntimeCommand::FetchMetadata { force: false, .. })
        ));

        app.refresh();
        app.apply_event(RuntimeEvent::Deployments {
            generation: app.generation,
            chain: Chain::Mainnet,
            entries: entries(Chain::Mainnet, &[0x01]),
        });
        let commands = app.take_runtime_commands();
        assert!(commands.iter().any(
            |c| matches!(c, RuntimeCommand::FetchMetadata { force: true, .. })
        ));
    }

    #[test]
    fn test_filter_command_narrows_rows() {
        let mut app = mock_app();
        let total = app.rows.len();
        let action = app.execute_command(&Command::Filter(Some("chain:polygon".to_string())));
        app.apply_action(action);
        let shown = app.filtered_rows().len();
        assert!(shown < total);
        assert!(app
            .filtered_rows()
            .iter()
            .all(|&idx| app.rows[idx].chain == Chain::Polygon));
    }

    #[test]
    fn test_permissions_flow_in_mock_mode() {
        let mut app = mock_app();
        let action = app.open_permissions();
        app.apply_action(action);

        let Some(Overlay::Permissions(editor)) = app.overlay.as_mut() else {
            panic!("permission editor not open");
        };
        assert!(editor.is_loaded());
        editor
            .add_member(Role::Admin, Address::repeat_byte(0xEE))
            .unwrap();
        assert!(editor.is_dirty());

        app.apply_action(Action::SubmitPermissions);
        let Some(Overlay::Permissions(editor)) = app.overlay.as_ref() else {
            panic!("permission editor closed");
        };
        assert!(!editor.is_dirty());
        assert_eq!(app.status_text().unwrap().0, "Permissions updated");
    }

    #[test]
    fn test_permissions_failure_keeps_edits() {
        let mut app = rpc_app();
        app.apply_event(RuntimeEvent::Deployments {
            generation: app.generation,
            chain: Chain::Mainnet,
            entries: entries(Chain::Mainnet, &[0x01]),
        });
        let action = app.open_permissions();
        app.apply_action(action);
        app.apply_event(RuntimeEvent::RolesReady {
            chain: Chain::Mainnet,
            address: Address::repeat_byte(0x01),
            members: vec![(Role::Admin, vec![Address::repeat_byte(0xA0)])],
        });

        if let Some(Overlay::Permissions(editor)) = app.overlay.as_mut() {
            editor
                .add_member(Role::Admin, Address::repeat_byte(0xEE))
                .unwrap();
        }
        app.apply_action(Action::SubmitPermissions);
        let commands = app.take_runtime_commands();
        assert!(commands
            .iter()
            .any(|c| matches!(c, RuntimeCommand::ApplyRoleChanges { .. })));

        app.apply_event(RuntimeEvent::MutationFailed {
            action: "grant admin".to_string(),
            message: "missing admin role".to_string(),
        });
        let Some(Overlay::Permissions(editor)) = app.overlay.as_ref() else {
            panic!("permission editor closed");
        };
        assert!(editor.is_dirty());
        assert!(!editor.is_saving());
        let (text, level) = app.status_text().unwrap();
        assert!(text.starts_with("Failed to update permissions"));
        assert_eq!(level, StatusLevel::Error);
    }

    #[test]
    fn test_reveal_flow_in_mock_mode() {
        let mut app = mock_app();
        // Move selection to a drop contract.
        let drop_pos = app
            .filtered_rows()
            .into_iter()
            .position(|idx| app.rows[idx].contract_type.supports_reveal())
            .unwrap();
        app.selected_row = drop_pos;

        let action = app.open_reveal(Some("3"));
        app.apply_action(action);
        assert!(matches!(app.overlay, Some(Overlay::Reveal(_))));

        app.apply_action(Action::SubmitReveal {
            batch: 3,
            password: "secret".to_string(),
        });
        assert!(app.overlay.is_none());
        assert_eq!(app.status_text().unwrap().0, "Batch revealed successfully");
    }

    #[test]
    fn test_reveal_rejected_for_non_drop() {
        let mut app = mock_app();
        let token_pos = app
            .filtered_rows()
            .into_iter()
            .position(|idx| !app.rows[idx].contract_type.supports_reveal())
            .unwrap();
        app.selected_row = token_pos;

        let action = app.open_reveal(None);
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Warn)));
        assert!(app.overlay.is_none());
    }

    #[test]
    fn test_currency_selection_stored_per_contract() {
        let mut app = mock_app();
        let action = app.open_currency();
        app.apply_action(action);
        let entry = app.selected_entry().unwrap();

        app.apply_action(Action::SelectCurrency {
            chain: entry.chain,
            address: Address::repeat_byte(0x55),
            label: "USDC (USD Coin)".to_string(),
        });
        assert!(app.overlay.is_none());
        assert_eq!(
            app.currency_choices.get(&entry.key()).unwrap().1,
            "USDC (USD Coin)"
        );
    }

    #[test]
    fn test_deploy_navigation_copies_route() {
        let mut app = mock_app();
        app.apply_action(Action::Navigate(NavigateTarget::Deploy(Chain::Polygon)));
        assert_eq!(app.take_copy().unwrap(), "/dashboard/polygon/new");
    }

    #[test]
    fn test_connect_command_requeues_chain() {
        let mut app = rpc_app();
        app.take_runtime_commands();
        let action =
            app.execute_command(&Command::Connect("fantom=https://rpc.ftm.example".to_string()));
        app.apply_action(action);

        assert!(app.configured.contains(&Chain::Fantom));
        let commands = app.take_runtime_commands();
        assert!(commands
            .iter()
            .any(|c| matches!(c, RuntimeCommand::Connect { chain: Chain::Fantom, .. })));
        assert!(commands
            .iter()
            .any(|c| matches!(c, RuntimeCommand::FetchDeployments { .. })));
    }

    #[test]
    fn test_wallet_prompt_rejects_invalid_keeps_open() {
        let mut app = mock_app();
        app.enter_prompt(PromptKind::Wallet);
        app.command.input = "vitalik.eth".to_string();
        app.apply_prompt(PromptKind::Wallet);
        assert_eq!(app.input_mode, InputMode::Prompt(PromptKind::Wallet));
        assert_eq!(app.command.input, "vitalik.eth");

        app.command.input = "dashboard".to_string();
        app.apply_prompt(PromptKind::Wallet);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_filter_panel_empty_selection_shows_nothing() {
        let mut app = mock_app();
        app.filter_panel = Some(FilterPanel::new());
        app.handle_filter_panel_key(crossterm::event::KeyCode::Char('n'));
        assert!(app.filtered_rows().is_empty());
        app.handle_filter_panel_key(crossterm::event::KeyCode::Char('a'));
        assert_eq!(app.filtered_rows().len(), app.rows.len());
    }
}
