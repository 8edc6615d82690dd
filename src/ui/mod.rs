//! Terminal rendering
//!
//! One pass per tick: base panels first, then whichever popup is open
//! (filter panel, module overlay, help) drawn last so it sits on top.

pub mod layout;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, DataMode, FilterColumn, InputMode, StatusLevel, View};
use crate::core::route::contract_path;
use crate::core::{Chain, ContractType};
use crate::domain::metadata::MetadataState;
use crate::domain::registry::ChainQuery;

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, app, areas.header);
    draw_chain_panel(f, app, areas.sidebar_chains);
    draw_scope_panel(f, app, areas.sidebar_scope);
    draw_contract_list(f, app, areas.table);
    draw_detail_panel(f, app, areas.detail);
    draw_status_line(f, app, areas.status_line);
    draw_command_line(f, app, areas.command_line);

    if app.filter_panel.is_some() {
        draw_filter_panel(f, app, areas.size);
    }

    if let Some(overlay) = &app.overlay {
        let popup = centered_rect(62, 68, areas.size);
        f.render_widget(Clear, popup);
        overlay.as_module().render(f, popup, &app.ctx);
    }

    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let wallet = app.ctx.wallet_segment.clone();
    let wallet = if wallet.starts_with("0x") {
        short_addr(&wallet)
    } else {
        wallet
    };
    let mode = match app.data_mode {
        DataMode::Rpc => Span::styled("rpc", Style::default().fg(Color::Green)),
        DataMode::Mock => Span::styled("mock", Style::default().fg(Color::Yellow)),
    };

    let left = Paragraph::new(Line::from(vec![
        Span::styled(
            " scry ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("wallet ", Style::default().fg(Color::DarkGray)),
        Span::raw(wallet),
        Span::raw("   "),
        Span::styled("mode ", Style::default().fg(Color::DarkGray)),
        mode,
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(left, chunks[0]);

    let ready = app
        .chain_queries
        .values()
        .filter(|q| q.is_ready())
        .count();
    let configured = app.configured.len().max(ready);
    let right = Paragraph::new(Line::from(vec![
        Span::styled("chains ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}/{}", ready, configured)),
        Span::raw("  "),
        Span::styled("contracts ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}", app.rows.len())),
        Span::raw("  "),
        Span::styled("round ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}", app.generation)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(right, chunks[1]);
}

/// One row per chain in the fixed chain order, glyph showing the
/// query state and a count once the listing resolved.
fn draw_chain_panel(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Chain::ALL
        .iter()
        .map(|chain| {
            let query = app.chain_queries.get(chain);
            let (glyph, style, tail) = match query {
                Some(ChainQuery::Ready(entries)) => (
                    "●",
                    Style::default().fg(Color::Green),
                    format!("{:>3}", entries.len()),
                ),
                Some(ChainQuery::Pending) => (
                    "◌",
                    Style::default().fg(Color::Yellow),
                    "  …".to_string(),
                ),
                Some(ChainQuery::Failed(_)) => {
                    ("✗", Style::default().fg(Color::Red), "err".to_string())
                }
                Some(ChainQuery::Disabled) | None => (
                    "─",
                    Style::default().fg(Color::DarkGray),
                    "  -".to_string(),
                ),
            };
            let name_style = if chain.is_testnet() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(glyph, style),
                Span::raw(" "),
                Span::styled(format!("{:<10}", chain.name()), name_style),
                Span::styled(tail, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Chains"));
    f.render_widget(list, area);
}

fn draw_scope_panel(f: &mut Frame, app: &App, area: Rect) {
    let visible = app.filtered_rows().len();
    let total = app.rows.len();
    let settled = app
        .rows
        .iter()
        .filter(|e| app.metadata.is_settled(e.key()))
        .count();

    let filter = app
        .filter
        .summary()
        .unwrap_or_else(|| "all contracts".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("filter ", Style::default().fg(Color::DarkGray)),
            Span::raw(truncate_str(&filter, area.width.saturating_sub(10) as usize)),
        ]),
        Line::from(vec![
            Span::styled("shown  ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} of {}", visible, total)),
        ]),
        Line::from(vec![
            Span::styled("named  ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} of {}", settled, total)),
        ]),
    ];

    let para =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Scope"));
    f.render_widget(para, area);
}

fn draw_contract_list(f: &mut Frame, app: &App, area: Rect) {
    let indices = app.filtered_rows();
    let focused =
        app.overlay.is_none() && app.filter_panel.is_none() && !app.help_open;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!("Contracts ({} of {})", indices.len(), app.rows.len()));

    if indices.is_empty() {
        let empty = empty_state_lines(app);
        let para = Paragraph::new(empty)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(para, area);
        return;
    }

    let items: Vec<ListItem> = indices
        .iter()
        .map(|&idx| {
            let entry = &app.rows[idx];
            let name = app.metadata.display_name(entry);
            let name_style = match app.metadata.state(entry.key()) {
                Some(MetadataState::Ready(_)) => Style::default(),
                Some(MetadataState::Failed(_)) => Style::default().fg(Color::DarkGray),
                _ => Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            };
            let chain_label = if entry.chain.is_testnet() {
                format!("{} ✦", entry.chain.name())
            } else {
                entry.chain.name().to_string()
            };
            let chain_style = if entry.chain.is_testnet() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<24}", truncate_str(&name, 23)), name_style),
                Span::raw(format!(
                    "{:<15}",
                    truncate_str(entry.contract_type.display_name(), 14)
                )),
                Span::styled(format!("{:<12}", chain_label), chain_style),
                Span::styled(
                    short_addr(&entry.address.to_string()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_row.min(indices.len().saturating_sub(1))));
    f.render_stateful_widget(list, area, &mut state);
}

/// What the list pane shows when no row survives: distinguishes "no
/// wallet yet", "still loading", "wallet has nothing deployed", and
/// "filter hides everything".
fn empty_state_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""), Line::from("")];
    if app.data_mode == DataMode::Rpc && app.resolved_wallet().is_none() {
        lines.push(Line::from(Span::styled(
            "Connect your wallet",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Use :wallet <address> to choose a deployer",
            Style::default().fg(Color::DarkGray),
        )));
    } else if app.chain_queries.values().any(|q| q.is_pending()) {
        lines.push(Line::from(Span::styled(
            "Loading deployments ...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if app.rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "You don't have any contracts",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Deploy a contract to get started (press d)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "No contracts match the filter",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Press f to adjust it or run :filter reset",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn draw_detail_panel(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.current_view() {
        View::ContractDetail => "Contract",
        View::Registry => "Inspector",
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(entry) = app.selected_entry() else {
        let para = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No contract selected",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center);
        f.render_widget(para, area);
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let key = entry.key();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("name    ", label),
            Span::raw(app.metadata.display_name(&entry)),
        ]),
        Line::from(vec![
            Span::styled("type    ", label),
            Span::raw(entry.contract_type.display_name().to_string()),
            Span::styled(
                format!("  ({})", entry.contract_type.slug()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled("chain   ", label),
            Span::raw(format!("{} (id {})", entry.chain.name(), entry.chain.id())),
            if entry.chain.is_testnet() {
                Span::styled("  testnet", Style::default().fg(Color::Yellow))
            } else {
                Span::raw("")
            },
        ]),
        Line::from(vec![
            Span::styled("address ", label),
            Span::raw(entry.address.to_string()),
        ]),
    ];

    match app.metadata.state(key) {
        Some(MetadataState::Failed(err)) => {
            lines.push(Line::from(vec![
                Span::styled("meta    ", label),
                Span::styled(
                    truncate_str(err, area.width.saturating_sub(12) as usize),
                    Style::default().fg(Color::Red),
                ),
            ]));
        }
        Some(MetadataState::Ready(_)) => {}
        _ => {
            lines.push(Line::from(vec![
                Span::styled("meta    ", label),
                Span::styled("resolving ...", Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    if let Some((_, label_text)) = app.currency_choices.get(&key) {
        lines.push(Line::from(vec![
            Span::styled("price in ", label),
            Span::raw(label_text.clone()),
        ]));
    }

    if app.current_view() == View::ContractDetail {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("route   ", label),
            Span::raw(contract_path(&app.ctx.wallet_segment, &entry)),
        ]));
        if let Some(meta) = app.metadata.metadata(key) {
            if let Some(desc) = meta.description.as_deref().filter(|d| !d.is_empty()) {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::raw(desc.to_string())));
            }
            if let Some(image) = meta.image.as_deref().filter(|i| !i.is_empty()) {
                lines.push(Line::from(vec![
                    Span::styled("image   ", label),
                    Span::raw(truncate_str(image, area.width.saturating_sub(12) as usize)),
                ]));
            }
        }
        let roles = entry.contract_type.roles();
        if !roles.is_empty() {
            let names: Vec<&str> = roles.iter().map(|r| r.name()).collect();
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("roles   ", label),
                Span::raw(names.join(", ")),
                Span::styled("  (p to edit)", Style::default().fg(Color::DarkGray)),
            ]));
        }
        if entry.contract_type.supports_reveal() {
            lines.push(Line::from(vec![
                Span::styled("reveal  ", label),
                Span::raw("delayed reveal supported"),
                Span::styled("  (v to reveal)", Style::default().fg(Color::DarkGray)),
            ]));
        }
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "enter for details",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let failed = app
        .chain_queries
        .values()
        .filter(|q| q.is_failed())
        .count();
    let view = match app.current_view() {
        View::Registry => "registry",
        View::ContractDetail => "detail",
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("view ", Style::default().fg(Color::DarkGray)),
        Span::raw(view),
        Span::raw("  "),
        Span::styled("rows ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}", app.filtered_rows().len())),
    ];
    if failed > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} chain(s) failed", failed),
            Style::default().fg(Color::Red),
        ));
    }
    if let Some(summary) = app.filter.summary() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("filter ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(summary, Style::default().fg(Color::Cyan)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_command_line(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.input_mode {
        InputMode::Command => {
            let mut spans = vec![
                Span::styled(" : ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command.input.clone()),
                Span::styled("▏", Style::default().fg(Color::Yellow)),
            ];
            if let Some(hint) = command_hint(&app.command.input) {
                spans.push(Span::styled(
                    format!("  ({})", hint),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
        InputMode::Prompt(kind) => Line::from(vec![
            Span::styled(
                format!(" > {} ", kind.label()),
                Style::default().fg(Color::LightCyan),
            ),
            Span::raw(app.command.input.clone()),
            Span::styled("▏", Style::default().fg(Color::LightCyan)),
            Span::styled(
                "  (enter confirm · esc cancel)",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let style = match level {
                    StatusLevel::Info => Style::default().fg(Color::LightGreen),
                    StatusLevel::Warn => Style::default().fg(Color::LightYellow),
                    StatusLevel::Error => Style::default().fg(Color::LightRed),
                };
                Line::from(vec![Span::raw(" "), Span::styled(text.to_string(), style)])
            } else {
                action_hints(app)
            }
        }
    };

    f.render_widget(Paragraph::new(line), area);
}

/// Inline usage hint for the word being typed on the command line.
fn command_hint(input: &str) -> Option<&'static str> {
    let word = input.split_whitespace().next()?;
    match word {
        "w" | "wallet" => Some("wallet <address|dashboard>"),
        "f" | "filter" => Some("filter [type:<slug>] [chain:<slug>] [text:<s>] | reset"),
        "c" | "copy" => Some("copy [route]"),
        "d" | "deploy" => Some("deploy [chain-slug]"),
        "v" | "reveal" => Some("reveal [batch-id]"),
        "m" | "media" => Some("media <path>"),
        "connect" => Some("connect <chain>=<url>"),
        _ => None,
    }
}

fn action_hints(app: &App) -> Line<'static> {
    let key = Style::default().fg(Color::LightCyan);
    let mut spans = vec![Span::raw(" ")];
    let mut push = |spans: &mut Vec<Span<'static>>, k: &'static str, desc: &'static str| {
        spans.push(Span::styled(k, key));
        spans.push(Span::raw(format!(" {}  ", desc)));
    };

    if let Some(entry) = app.selected_entry() {
        push(&mut spans, "enter", "Open");
        push(&mut spans, "c", "Copy");
        push(&mut spans, "p", "Roles");
        push(&mut spans, "u", "Currency");
        if entry.contract_type.supports_reveal() {
            push(&mut spans, "v", "Reveal");
        }
    }
    push(&mut spans, "f", "Filter");
    push(&mut spans, "d", "Deploy");
    push(&mut spans, ":", "Command");
    push(&mut spans, "?", "Help");
    push(&mut spans, "q", "Quit");
    Line::from(spans)
}

fn draw_filter_panel(f: &mut Frame, app: &App, size: Rect) {
    let Some(panel) = &app.filter_panel else {
        return;
    };
    let popup = centered_rect(56, 62, size);
    f.render_widget(Clear, popup);

    let visible = app.filtered_rows().len();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Filter · {} of {} shown", visible, app.rows.len()));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let type_items: Vec<ListItem> = ContractType::ALL
        .iter()
        .map(|ty| {
            let on = app.filter.types.contains(ty);
            ListItem::new(format!("[{}] {}", if on { "x" } else { " " }, ty.display_name()))
        })
        .collect();
    let chain_items: Vec<ListItem> = Chain::ALL
        .iter()
        .map(|chain| {
            let on = app.filter.chains.contains(chain);
            ListItem::new(format!("[{}] {}", if on { "x" } else { " " }, chain.name()))
        })
        .collect();

    let active = Style::default().fg(Color::Cyan);
    let idle = Style::default().fg(Color::DarkGray);
    let (type_style, chain_style) = match panel.column {
        FilterColumn::Types => (active, idle),
        FilterColumn::Chains => (idle, active),
    };

    let type_list = List::new(type_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Types")
                .border_style(type_style),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let chain_list = List::new(chain_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Chains")
                .border_style(chain_style),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut type_state = ListState::default();
    let mut chain_state = ListState::default();
    match panel.column {
        FilterColumn::Types => type_state.select(Some(panel.cursor)),
        FilterColumn::Chains => chain_state.select(Some(panel.cursor)),
    }
    f.render_stateful_widget(type_list, columns[0], &mut type_state);
    f.render_stateful_widget(chain_list, columns[1], &mut chain_state);

    let hints = Paragraph::new(Line::from(Span::styled(
        " space toggle · a all · n none · r reset · tab column · esc close",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(hints, rows[1]);
}

fn draw_help_popup(f: &mut Frame, size: Rect) {
    let popup = centered_rect(72, 70, size);
    f.render_widget(Clear, popup);

    let key = Style::default().fg(Color::LightCyan);
    let head = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Keys", head)),
        help_line(key, "j/k, arrows", "move selection"),
        help_line(key, "g / G", "jump to top / bottom"),
        help_line(key, "enter", "open contract detail"),
        help_line(key, "esc / h", "back"),
        help_line(key, "f", "filter panel"),
        help_line(key, "r", "refresh (bypasses the metadata cache)"),
        help_line(key, "w", "set wallet"),
        help_line(key, "c / C", "copy address / copy route"),
        help_line(key, "e", "export visible rows to CSV"),
        help_line(key, "d", "deploy picker"),
        help_line(key, "p", "permission editor"),
        help_line(key, "u", "currency picker"),
        help_line(key, "v", "reveal a delayed batch"),
        help_line(key, "m", "inspect a media path"),
        Line::from(""),
        Line::from(Span::styled("Commands", head)),
        help_line(key, ":wallet <addr|dashboard>", "switch deployer"),
        help_line(key, ":filter type:<slug> chain:<slug> text:<s>", "narrow the list"),
        help_line(key, ":filter reset", "clear all filters"),
        help_line(key, ":connect <chain>=<url>", "add an endpoint at runtime"),
        help_line(key, ":deploy [slug]", "copy a deploy route"),
        help_line(key, ":export", "write visible rows to CSV"),
        help_line(key, ":q", "quit"),
        Line::from(""),
        Line::from(Span::styled(
            "any key closes this popup",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

fn help_line(key: Style, k: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<28}", k), key),
        Span::raw(desc),
    ])
}

/// Shorten a hex address for list cells: 0x1234ab..cdef
pub fn short_addr(addr: &str) -> String {
    if addr.len() <= 12 {
        return addr.to_string();
    }
    format!("{}..{}", &addr[..6], &addr[addr.len() - 4..])
}

pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// Popup rect at the given percentage of the screen, centered.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_addr_keeps_ends() {
        let s = short_addr("0x1234567890abcdef1234567890abcdef12345678");
        assert_eq!(s, "0x1234..5678");
        assert_eq!(short_addr("0xabc"), "0xabc");
    }

    #[test]
    fn truncate_str_marks_cut() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a very long name here", 8), "a very …");
    }

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, outer);
        assert!(popup.width <= 60);
        assert!(popup.x >= outer.x && popup.right() <= outer.right());
        assert!(popup.y >= outer.y && popup.bottom() <= outer.bottom());
    }

    #[test]
    fn command_hint_matches_known_words() {
        assert_eq!(
            command_hint("filter "),
            Some("filter [type:<slug>] [chain:<slug>] [text:<s>] | reset")
        );
        assert_eq!(command_hint("refresh"), None);
        assert_eq!(command_hint(""), None);
    }
}
