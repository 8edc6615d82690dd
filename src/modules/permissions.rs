//! Permission editor overlay for a contract's role membership
//!
//! Mirrors the form semantics of the web dashboard: the loaded
//! membership is the baseline, edits are tracked against it, reset
//! restores the baseline, and a reload that arrives while the form is
//! dirty is ignored. Submit hands the app a grant/revoke diff.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::core::{Action, Context, ContractEntry, Module, NotifyLevel, PromptKind, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditorState {
    Loading,
    Loaded,
    Failed(String),
}

pub struct PermissionEditor {
    entry: ContractEntry,
    display_name: String,
    roles: Vec<Role>,
    /// Membership as loaded from chain (or as last submitted)
    snapshot: BTreeMap<Role, Vec<Address>>,
    /// Working copy the user edits
    edited: BTreeMap<Role, Vec<Address>>,
    state: EditorState,
    cursor_role: usize,
    cursor_member: usize,
    saving: bool,
}

impl PermissionEditor {
    pub fn new(entry: ContractEntry, display_name: String) -> Self {
        let roles = entry.contract_type.roles().to_vec();
        Self {
            entry,
            display_name,
            roles,
            snapshot: BTreeMap::new(),
            edited: BTreeMap::new(),
            state: EditorState::Loading,
            cursor_role: 0,
            cursor_member: 0,
            saving: false,
        }
    }

    pub fn entry(&self) -> &ContractEntry {
        &self.entry
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_loaded(&self) -> bool {
        self.state == EditorState::Loaded
    }

    pub fn is_dirty(&self) -> bool {
        self.edited != self.snapshot
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Ingest a membership snapshot from the chain. Ignored while the
    /// form has unsaved edits so a reload cannot clobber them.
    pub fn apply_members(&mut self, members: Vec<(Role, Vec<Address>)>) {
        if self.is_dirty() {
            return;
        }
        let mut snapshot: BTreeMap<Role, Vec<Address>> = BTreeMap::new();
        for (role, accounts) in members {
            snapshot.insert(role, accounts);
        }
        for role in &self.roles {
            snapshot.entry(*role).or_default();
        }
        self.edited = snapshot.clone();
        self.snapshot = snapshot;
        self.state = EditorState::Loaded;
        self.clamp_cursor();
    }

    pub fn apply_failure(&mut self, message: String) {
        if self.state != EditorState::Loaded {
            self.state = EditorState::Failed(message);
        }
    }

    /// Restore the working copy to the loaded baseline.
    pub fn reset(&mut self) {
        self.edited = self.snapshot.clone();
        self.clamp_cursor();
    }

    /// Grants and revokes needed to move the chain from the baseline to
    /// the edited membership.
    pub fn diff(&self) -> (Vec<(Role, Address)>, Vec<(Role, Address)>) {
        let mut grants = Vec::new();
        let mut revokes = Vec::new();
        for role in &self.roles {
            let before = self.snapshot.get(role).cloned().unwrap_or_default();
            let after = self.edited.get(role).cloned().unwrap_or_default();
            for member in &after {
                if !before.contains(member) {
                    grants.push((*role, *member));
                }
            }
            for member in &before {
                if !after.contains(member) {
                    revokes.push((*role, *member));
                }
            }
        }
        (grants, revokes)
    }

    pub fn add_member(&mut self, role: Role, member: Address) -> Result<(), String> {
        if !self.is_loaded() {
            return Err("role membership is still loading".to_string());
        }
        let members = self.edited.entry(role).or_default();
        if members.contains(&member) {
            return Err(format!("{} is already a {} member", member, role.name()));
        }
        members.push(member);
        Ok(())
    }

    fn remove_selected(&mut self) -> Option<(Role, Address)> {
        let role = *self.roles.get(self.cursor_role)?;
        let members = self.edited.get_mut(&role)?;
        if self.cursor_member >= members.len() {
            return None;
        }
        let removed = members.remove(self.cursor_member);
        self.clamp_cursor();
        Some((role, removed))
    }

    pub fn selected_role(&self) -> Option<Role> {
        self.roles.get(self.cursor_role).copied()
    }

    /// Baseline reset after a successful submit.
    pub fn confirm_saved(&mut self) {
        self.snapshot = self.edited.clone();
        self.saving = false;
    }

    pub fn mark_saving(&mut self) {
        self.saving = true;
    }

    pub fn submit_failed(&mut self) {
        self.saving = false;
    }

    fn clamp_cursor(&mut self) {
        if self.cursor_role >= self.roles.len() {
            self.cursor_role = self.roles.len().saturating_sub(1);
        }
        let len = self
            .selected_role()
            .and_then(|role| self.edited.get(&role))
            .map(|m| m.len())
            .unwrap_or(0);
        if self.cursor_member >= len {
            self.cursor_member = len.saturating_sub(1);
        }
    }

    fn status_line(&self) -> (String, Color) {
        match &self.state {
            EditorState::Loading => ("Loading role membership ...".to_string(), Color::DarkGray),
            EditorState::Failed(message) => (format!("Load failed: {}", message), Color::Red),
            EditorState::Loaded if self.saving => {
                ("Saving permissions ...".to_string(), Color::Yellow)
            }
            EditorState::Loaded if self.is_dirty() => {
                ("Unsaved changes".to_string(), Color::Yellow)
            }
            EditorState::Loaded => ("In sync with chain".to_string(), Color::Green),
        }
    }
}

impl Module for PermissionEditor {
    fn title(&self) -> String {
        format!("Permissions - {}", self.display_name)
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Context) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::CloseOverlay,
            KeyCode::Tab | KeyCode::Char('J') => {
                if !self.roles.is_empty() {
                    self.cursor_role = (self.cursor_role + 1) % self.roles.len();
                    self.cursor_member = 0;
                    self.clamp_cursor();
                }
                Action::None
            }
            KeyCode::BackTab | KeyCode::Char('K') => {
                if !self.roles.is_empty() {
                    self.cursor_role =
                        (self.cursor_role + self.roles.len() - 1) % self.roles.len();
                    self.cursor_member = 0;
                    self.clamp_cursor();
                }
                Action::None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.cursor_member = self.cursor_member.saturating_add(1);
                self.clamp_cursor();
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor_member = self.cursor_member.saturating_sub(1);
                Action::None
            }
            KeyCode::Char('a') => {
                if self.saving {
                    return Action::Notify(
                        "Saving permissions ...".to_string(),
                        NotifyLevel::Warn,
                    );
                }
                if !self.is_loaded() {
                    return Action::Notify(
                        "Role membership is still loading".to_string(),
                        NotifyLevel::Warn,
                    );
                }
                match self.selected_role() {
                    Some(role) => Action::OpenPrompt(PromptKind::RoleMember { role }),
                    None => Action::None,
                }
            }
            KeyCode::Char('d') | KeyCode::Char('x') => {
                if !self.is_loaded() || self.saving {
                    return Action::None;
                }
                match self.remove_selected() {
                    Some((role, member)) => Action::Notify(
                        format!("Removed {} from {} (unsaved)", member, role.name()),
                        NotifyLevel::Info,
                    ),
                    None => Action::None,
                }
            }
            KeyCode::Char('r') => {
                // Reset is disabled while loading, saving, or pristine.
                if self.is_loaded() && !self.saving && self.is_dirty() {
                    self.reset();
                    return Action::Notify("Edits discarded".to_string(), NotifyLevel::Info);
                }
                Action::None
            }
            KeyCode::Char('s') | KeyCode::Enter => {
                if self.saving {
                    return Action::None;
                }
                if !self.is_loaded() {
                    return Action::Notify(
                        "Role membership is still loading".to_string(),
                        NotifyLevel::Warn,
                    );
                }
                if !self.is_dirty() {
                    return Action::Notify("No changes to save".to_string(), NotifyLevel::Info);
                }
                Action::SubmitPermissions
            }
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &Context) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(Style::default().fg(Color::Cyan));

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("Contract: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} ({})", self.display_name, self.entry.address)),
        ]));
        lines.push(Line::default());

        for (role_idx, role) in self.roles.iter().enumerate() {
            let members = self.edited.get(role).cloned().unwrap_or_default();
            let marker = if role_idx == self.cursor_role {
                "▸"
            } else {
                " "
            };
            lines.push(Line::from(Span::styled(
                format!("{} {} ({})", marker, role.name(), members.len()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));

            let baseline = self.snapshot.get(role).cloned().unwrap_or_default();
            for (member_idx, member) in members.iter().enumerate() {
                let selected =
                    role_idx == self.cursor_role && member_idx == self.cursor_member;
                let added = !baseline.contains(member);
                let prefix = if added { "+ " } else { "  " };
                let mut style = if added {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                if selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                lines.push(Line::from(Span::styled(
                    format!("   {}{}", prefix, member),
                    style,
                )));
            }
            if members.is_empty() {
                lines.push(Line::from(Span::styled(
                    "     (no members)",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        lines.push(Line::default());
        let (status, color) = self.status_line();
        lines.push(Line::from(Span::styled(
            status,
            Style::default().fg(color),
        )));
        lines.push(Line::from(Span::styled(
            "a add · d remove · r reset · s save · tab role · esc close",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Chain, ContractType};

    fn editor() -> PermissionEditor {
        let entry = ContractEntry::new(
            Chain::Mainnet,
            Address::repeat_byte(0x11),
            ContractType::NftDrop,
        );
        PermissionEditor::new(entry, "My Drop".to_string())
    }

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_dirty_tracking_and_reset() {
        let mut editor = editor();
        editor.apply_members(vec![(Role::Admin, vec![addr(0xAA)])]);
        assert!(editor.is_loaded());
        assert!(!editor.is_dirty());

        editor.add_member(Role::Minter, addr(0xBB)).unwrap();
        assert!(editor.is_dirty());

        editor.reset();
        assert!(!editor.is_dirty());
        assert_eq!(editor.diff(), (vec![], vec![]));
    }

    #[test]
    fn test_reload_does_not_clobber_dirty_edits() {
        let mut editor = editor();
        editor.apply_members(vec![(Role::Admin, vec![addr(0xAA)])]);
        editor.add_member(Role::Admin, addr(0xBB)).unwrap();

        // A second snapshot arrives while the form is dirty.
        editor.apply_members(vec![(Role::Admin, vec![addr(0xCC)])]);

        let (grants, _) = editor.diff();
        assert_eq!(grants, vec![(Role::Admin, addr(0xBB))]);
    }

    #[test]
    fn test_diff_has_grants_and_revokes() {
        let mut editor = editor();
        editor.apply_members(vec![
            (Role::Admin, vec![addr(0xAA)]),
            (Role::Minter, vec![addr(0xBB), addr(0xCC)]),
        ]);

        editor.add_member(Role::Admin, addr(0xDD)).unwrap();
        editor.cursor_role = 1; // minter
        editor.cursor_member = 0;
        editor.remove_selected();

        let (grants, revokes) = editor.diff();
        assert_eq!(grants, vec![(Role::Admin, addr(0xDD))]);
        assert_eq!(revokes, vec![(Role::Minter, addr(0xBB))]);
    }

    #[test]
    fn test_submit_resets_baseline() {
        let mut editor = editor();
        editor.apply_members(vec![(Role::Admin, vec![addr(0xAA)])]);
        editor.add_member(Role::Admin, addr(0xBB)).unwrap();
        editor.mark_saving();
        assert!(editor.is_saving());

        editor.confirm_saved();
        assert!(!editor.is_saving());
        assert!(!editor.is_dirty());
        // Baseline now includes the submitted member.
        editor.reset();
        assert_eq!(
            editor.edited.get(&Role::Admin).unwrap(),
            &vec![addr(0xAA), addr(0xBB)]
        );
    }

    #[test]
    fn test_add_rejects_duplicates_and_loading() {
        let mut editor = editor();
        assert!(editor.add_member(Role::Admin, addr(0xAA)).is_err());

        editor.apply_members(vec![(Role::Admin, vec![addr(0xAA)])]);
        assert!(editor.add_member(Role::Admin, addr(0xAA)).is_err());
        assert!(editor.add_member(Role::Admin, addr(0xBB)).is_ok());
    }
}
