use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Precomputed screen regions for one frame.
///
/// Computed once per draw and also used by the mouse handler to map
/// click coordinates back onto the contract table.
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
    pub sidebar: Rect,
    pub sidebar_chains: Rect,
    pub sidebar_scope: Rect,
    pub table: Rect,
    pub detail: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    let header = vertical[0];
    let main = vertical[1];
    let footer = vertical[2];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(24),
            Constraint::Percentage(42),
            Constraint::Percentage(34),
        ])
        .split(main);

    let sidebar = columns[0];
    let table = columns[1];
    let detail = columns[2];

    let sidebar_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(7)])
        .split(sidebar);

    let footer_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(footer);

    UiAreas {
        size,
        header,
        main,
        footer,
        sidebar,
        sidebar_chains: sidebar_rows[0],
        sidebar_scope: sidebar_rows[1],
        table,
        detail,
        status_line: footer_rows[0],
        command_line: footer_rows[1],
    }
}
