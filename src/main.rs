mod app;
mod config;
mod core;
mod domain;
mod infrastructure;
mod modules;
mod store;
mod ui;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use alloy_primitives::Address;
use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use crate::app::{App, DataMode, InputMode, StatusLevel};
use crate::core::{Chain, NavigateTarget, PromptKind};
use crate::infrastructure::ethereum::ProviderConfig;
use crate::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, WorkerConfig};
use crate::store::MetadataStore;

#[derive(Debug, Parser)]
#[command(
    name = "scry",
    version,
    about = "Scry: a cross-chain contract dashboard TUI"
)]
struct Args {
    /// Deployer wallet address (overrides the config file)
    #[arg(long)]
    wallet: Option<String>,

    /// Chain endpoint as <chain>=<url>, repeatable
    /// (e.g. --rpc polygon=https://polygon-rpc.com)
    #[arg(long = "rpc", value_name = "CHAIN=URL")]
    rpc: Vec<String>,

    /// Config file path (overrides SCRY_CONFIG and the default locations)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match args.config.as_deref() {
        Some(path) => config::load_path(path),
        None => config::load(),
    };

    let endpoints = endpoints_from_args_and_config(&args, &config)?;
    let registries = registries_for(&config, &endpoints)?;
    let gateway = config.gateway();
    let (default_wallet, wallet_warning) = default_wallet_from(&args, &config)?;

    let cache_path = config::metadata_db_path();
    if let Some(parent) = cache_path.as_ref().and_then(|p| p.parent()) {
        let _ = fs::create_dir_all(parent);
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let data_mode = if endpoints.is_empty() {
        DataMode::Mock
    } else {
        DataMode::Rpc
    };
    let bridge = match data_mode {
        DataMode::Rpc => Some(RuntimeBridge::new(WorkerConfig {
            endpoints: endpoints.clone(),
            registries,
            gateway,
            cache_path: cache_path.clone(),
        })?),
        DataMode::Mock => None,
    };

    let mut app = App::new(config);
    app.data_mode = data_mode;
    app.default_wallet = default_wallet;
    app.configured = endpoints.keys().copied().collect();

    if data_mode == DataMode::Rpc {
        if let Some(path) = &cache_path {
            match preload_metadata(&mut app, path) {
                Ok(0) => {}
                Ok(n) => app.set_status(
                    format!("Loaded {} cached contract names", n),
                    StatusLevel::Info,
                ),
                Err(err) => app.set_status(
                    format!("Metadata cache disabled: {err}"),
                    StatusLevel::Warn,
                ),
            }
        }
    }
    if let Some(warning) = wallet_warning {
        app.set_status(warning, StatusLevel::Warn);
    }
    app.start();

    let res = run_app(&mut terminal, app, bridge.as_ref());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    bridge: Option<&RuntimeBridge>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, bridge);
        app.sync_context();
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            if let Some(bridge) = bridge {
                let _ = bridge.send(RuntimeCommand::Shutdown);
            }
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, bridge);
    }
}

/// Drain worker events into the app, flush queued commands back to the
/// worker, and push any pending copy to the system clipboard.
fn pump_background(app: &mut App, bridge: Option<&RuntimeBridge>) {
    if let Some(bridge) = bridge {
        for event in bridge.poll_events() {
            app.apply_event(event);
        }
        for cmd in app.take_runtime_commands() {
            let _ = bridge.send(cmd);
        }
    }

    if let Some(text) = app.take_copy() {
        copy_to_clipboard(app, text);
    }
}

fn copy_to_clipboard(app: &mut App, text: String) {
    use arboard::Clipboard;

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                app.ctx.set_clipboard(text);
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}

/// Config file endpoints first, then CLI `--rpc chain=url` pairs on
/// top. A chain given twice keeps the CLI value.
fn endpoints_from_args_and_config(
    args: &Args,
    config: &config::Config,
) -> Result<BTreeMap<Chain, ProviderConfig>> {
    let mut endpoints = BTreeMap::new();

    for (&chain, chain_config) in &config.chains {
        if let Some(endpoint) = endpoint_from_chain_config(chain_config) {
            let endpoint = endpoint
                .with_context(|| format!("bad endpoint for {} in config", chain.name()))?;
            endpoints.insert(chain, endpoint);
        }
    }

    for raw in &args.rpc {
        let (slug, url) = raw
            .split_once('=')
            .with_context(|| format!("--rpc '{raw}': expected <chain>=<url>"))?;
        let chain = Chain::from_slug(slug.trim())
            .with_context(|| format!("--rpc '{raw}': unknown chain '{}'", slug.trim()))?;
        let endpoint = ProviderConfig::parse(&normalize_http_endpoint(url))
            .with_context(|| format!("--rpc '{raw}'"))?;
        endpoints.insert(chain, endpoint);
    }

    Ok(endpoints)
}

/// Endpoint precedence within one chain's config block: ws, then ipc
/// (unix only), then rpc.
fn endpoint_from_chain_config(chain_config: &config::ChainConfig) -> Option<Result<ProviderConfig>> {
    if let Some(ws) = chain_config
        .ws
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(ProviderConfig::parse(ws));
    }
    #[cfg(unix)]
    if let Some(ipc) = chain_config
        .ipc
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(ProviderConfig::parse(ipc));
    }
    if let Some(rpc) = chain_config
        .rpc
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(ProviderConfig::parse(&normalize_http_endpoint(rpc)));
    }
    None
}

fn normalize_http_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.contains("://") || trimmed.ends_with(".ipc") || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// One registry address per configured chain, from the config override
/// or the well-known default.
fn registries_for(
    config: &config::Config,
    endpoints: &BTreeMap<Chain, ProviderConfig>,
) -> Result<BTreeMap<Chain, Address>> {
    let mut registries = BTreeMap::new();
    for &chain in endpoints.keys() {
        let raw = config.registry_for(chain);
        let address = Address::from_str(raw.trim())
            .ok()
            .with_context(|| format!("invalid registry address '{}' for {}", raw, chain.name()))?;
        registries.insert(chain, address);
    }
    Ok(registries)
}

/// CLI wallet wins over the config file. A malformed CLI flag is a
/// hard error; a malformed config entry only warns.
fn default_wallet_from(
    args: &Args,
    config: &config::Config,
) -> Result<(Option<Address>, Option<String>)> {
    if let Some(raw) = args
        .wallet
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let address = Address::from_str(raw)
            .ok()
            .with_context(|| format!("invalid --wallet address '{raw}'"))?;
        return Ok((Some(address), None));
    }

    if let Some(raw) = config
        .wallet
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return match Address::from_str(raw) {
            Ok(address) => Ok((Some(address), None)),
            Err(_) => Ok((
                None,
                Some(format!("Ignoring invalid wallet in config: {raw}")),
            )),
        };
    }

    Ok((None, None))
}

/// Seed the in-memory cache from the SQLite store so cached names show
/// on the first paint. The worker owns its own connection afterwards.
fn preload_metadata(app: &mut App, path: &Path) -> Result<usize> {
    let store = MetadataStore::open(path)?;
    let rows = store.load_all()?;
    let mut loaded = 0;
    for row in rows {
        let Some(chain) = Chain::from_id(row.chain_id) else {
            continue;
        };
        let Ok(address) = Address::from_str(&row.address) else {
            continue;
        };
        app.metadata.insert_ready((chain, address), row.metadata);
        loaded += 1;
    }
    Ok(loaded)
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        app.help_open = false;
        return;
    }

    if app.overlay.is_some() {
        handle_overlay_key(app, key);
        return;
    }

    if app.filter_panel.is_some() {
        app.handle_filter_panel_key(key.code);
        return;
    }

    match app.input_mode.clone() {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::Prompt(kind) => handle_prompt_mode(app, key, kind),
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) {
    let Some(overlay) = app.overlay.as_mut() else {
        return;
    };
    let action = overlay.as_module_mut().handle_key(key, &mut app.ctx);
    app.apply_action(action);
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Char('?'), _) => app.help_open = true,
        (KeyCode::Char(':'), _) => app.enter_command(),
        (KeyCode::Up | KeyCode::Char('k'), _) => app.move_selection_up(),
        (KeyCode::Down | KeyCode::Char('j'), _) => app.move_selection_down(),
        (KeyCode::Char('g'), _) => app.go_to_top(),
        (KeyCode::Char('G'), _) => app.go_to_bottom(),
        (KeyCode::Enter | KeyCode::Char('l'), _) => {
            app.apply_action(crate::core::Action::Navigate(NavigateTarget::Detail));
        }
        (KeyCode::Esc | KeyCode::Char('h'), _) => {
            app.apply_action(crate::core::Action::Navigate(NavigateTarget::Back));
        }
        (KeyCode::Char('f'), _) => app.open_filter_panel(),
        (KeyCode::Char('r'), _) => app.refresh(),
        (KeyCode::Char('w'), _) => app.enter_prompt(PromptKind::Wallet),
        (KeyCode::Char('c'), _) => {
            let action = app.copy_selected_address();
            app.apply_action(action);
        }
        (KeyCode::Char('C'), _) => {
            let action = app.copy_selected_route();
            app.apply_action(action);
        }
        (KeyCode::Char('e'), _) => {
            let action = app.export_visible();
            app.apply_action(action);
        }
        (KeyCode::Char('d'), _) => app.open_deploy(),
        (KeyCode::Char('p'), _) => {
            let action = app.open_permissions();
            app.apply_action(action);
        }
        (KeyCode::Char('u'), _) => {
            let action = app.open_currency();
            app.apply_action(action);
        }
        (KeyCode::Char('v'), _) => {
            let action = app.open_reveal(None);
            app.apply_action(action);
        }
        (KeyCode::Char('m'), _) => app.enter_prompt(PromptKind::MediaPath),
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_prompt_mode(app: &mut App, key: KeyEvent, kind: PromptKind) {
    match key.code {
        KeyCode::Esc => app.exit_prompt(),
        KeyCode::Enter => app.apply_prompt(kind),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.help_open
        || app.overlay.is_some()
        || app.filter_panel.is_some()
        || matches!(app.input_mode, InputMode::Command | InputMode::Prompt(_))
    {
        return;
    }
    let Some(size) = terminal_rect() else {
        return;
    };
    let areas = ui::layout::areas(size);
    let col = mouse.column;
    let row = mouse.row;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_click(app, areas, col, row),
        MouseEventKind::ScrollUp => app.move_selection_up(),
        MouseEventKind::ScrollDown => app.move_selection_down(),
        _ => {}
    }
}

fn handle_click(app: &mut App, areas: ui::layout::UiAreas, col: u16, row: u16) {
    if rect_contains(areas.table, col, row) {
        let inner = rect_inner(areas.table);
        if !rect_contains(inner, col, row) {
            return;
        }
        let row_idx = (row - inner.y) as usize;
        let list_len = app.filtered_rows().len();
        if row_idx >= inner.height as usize || list_len == 0 {
            return;
        }
        // Account for the scroll offset the list applies once the
        // selection runs past the visible window.
        let visible_height = inner.height.max(1) as usize;
        let selected = app.selected_row;
        let offset = if selected >= visible_height {
            selected.saturating_sub(visible_height.saturating_sub(1))
        } else {
            0
        };
        let clicked = offset + row_idx;
        if clicked < list_len {
            app.selected_row = clicked;
        }
        return;
    }

    if rect_contains(areas.detail, col, row) {
        app.apply_action(crate::core::Action::Navigate(NavigateTarget::Detail));
    }
}

fn terminal_rect() -> Option<Rect> {
    let (width, height) = crossterm::terminal::size().ok()?;
    Some(Rect {
        x: 0,
        y: 0,
        width,
        height,
    })
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

fn rect_inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}
