//! Deploy network picker
//!
//! Chains grouped into Mainnets and Testnets, in aggregation order.
//! Picking one resolves to the deploy route for the active wallet.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::core::{Action, Chain, Context, Module, NavigateTarget};

pub struct DeployPicker {
    chains: Vec<Chain>,
    cursor: usize,
}

impl DeployPicker {
    pub fn new() -> Self {
        let chains = Chain::mainnets().chain(Chain::testnets()).collect();
        Self { chains, cursor: 0 }
    }

    fn selected(&self) -> Option<Chain> {
        self.chains.get(self.cursor).copied()
    }
}

impl Default for DeployPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for DeployPicker {
    fn title(&self) -> String {
        "Deploy contract".to_string()
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Context) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::CloseOverlay,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < self.chains.len() {
                    self.cursor += 1;
                }
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Enter => match self.selected() {
                Some(chain) => Action::Navigate(NavigateTarget::Deploy(chain)),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &Context) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(Style::default().fg(Color::Cyan));

        let mut lines: Vec<Line> = Vec::new();
        let mut last_was_testnet: Option<bool> = None;
        for (idx, chain) in self.chains.iter().enumerate() {
            if last_was_testnet != Some(chain.is_testnet()) {
                let header = if chain.is_testnet() {
                    "Testnets"
                } else {
                    "Mainnets"
                };
                lines.push(Line::from(Span::styled(
                    header,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )));
                last_was_testnet = Some(chain.is_testnet());
            }
            let mut style = Style::default();
            if idx == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<12}", chain.name()), style),
                Span::styled(
                    format!("/{}/new", chain.slug()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "enter pick network · esc close",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_mainnets_listed_before_testnets() {
        let picker = DeployPicker::new();
        let first_testnet = picker
            .chains
            .iter()
            .position(|c| c.is_testnet())
            .expect("chain set has testnets");
        assert!(picker.chains[..first_testnet]
            .iter()
            .all(|c| !c.is_testnet()));
        assert!(picker.chains[first_testnet..]
            .iter()
            .all(|c| c.is_testnet()));
        assert_eq!(picker.chains[0], Chain::Mainnet);
    }

    #[test]
    fn test_enter_navigates_to_deploy_route() {
        let mut ctx = Context::new();
        let mut picker = DeployPicker::new();
        picker.handle_key(key(KeyCode::Char('j')), &mut ctx);
        let action = picker.handle_key(key(KeyCode::Enter), &mut ctx);
        match action {
            Action::Navigate(NavigateTarget::Deploy(chain)) => {
                assert_eq!(chain, Chain::Polygon);
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
