//! Delayed-reveal dialog for drop contracts
//!
//! Collects a batch identifier and the password the batch was
//! encrypted with, then hands the pair to the app for submission.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::core::{Action, Context, ContractEntry, Module, NotifyLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Batch,
    Password,
}

pub struct RevealDialog {
    entry: ContractEntry,
    display_name: String,
    batch_input: String,
    password: String,
    field: Field,
    submitting: bool,
}

impl RevealDialog {
    pub fn new(entry: ContractEntry, display_name: String) -> Self {
        Self {
            entry,
            display_name,
            batch_input: String::new(),
            password: String::new(),
            field: Field::Batch,
            submitting: false,
        }
    }

    pub fn entry(&self) -> &ContractEntry {
        &self.entry
    }

    /// Pre-fill the batch field, e.g. from `:reveal 3`.
    pub fn prefill_batch(&mut self, value: &str) {
        self.batch_input = value.chars().filter(|c| c.is_ascii_digit()).collect();
        if !self.batch_input.is_empty() {
            self.field = Field::Password;
        }
    }

    pub fn mark_submitting(&mut self) {
        self.submitting = true;
    }

    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            Field::Batch => Field::Password,
            Field::Password => Field::Batch,
        };
    }

    fn submit(&self) -> Action {
        let Ok(batch) = self.batch_input.parse::<u64>() else {
            return Action::Notify("Enter a numeric batch id".to_string(), NotifyLevel::Warn);
        };
        if self.password.is_empty() {
            return Action::Notify(
                "Enter the password the batch was hidden with".to_string(),
                NotifyLevel::Warn,
            );
        }
        Action::SubmitReveal {
            batch,
            password: self.password.clone(),
        }
    }

    fn field_line<'a>(&self, label: &'a str, value: String, active: bool) -> Line<'a> {
        let marker = if active { "▸ " } else { "  " };
        let label_style = if active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![
            Span::styled(format!("{}{:<10}", marker, label), label_style),
            Span::raw(value),
        ];
        if active {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    }
}

impl Module for RevealDialog {
    fn title(&self) -> String {
        format!("Reveal batch - {}", self.display_name)
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Context) -> Action {
        if self.submitting {
            return match key.code {
                KeyCode::Esc => Action::CloseOverlay,
                _ => Action::None,
            };
        }
        match key.code {
            KeyCode::Esc => Action::CloseOverlay,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.toggle_field();
                Action::None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                match self.field {
                    Field::Batch => self.batch_input.pop(),
                    Field::Password => self.password.pop(),
                };
                Action::None
            }
            KeyCode::Char(c) => {
                match self.field {
                    // Batch ids are plain integers
                    Field::Batch => {
                        if c.is_ascii_digit() {
                            self.batch_input.push(c);
                        }
                    }
                    Field::Password => self.password.push(c),
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &Context) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(Style::default().fg(Color::Cyan));

        let masked = "•".repeat(self.password.chars().count());
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Contract: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.entry.address.to_string()),
            ]),
            Line::default(),
            self.field_line("Batch id", self.batch_input.clone(), self.field == Field::Batch),
            self.field_line("Password", masked, self.field == Field::Password),
            Line::default(),
        ];
        if self.submitting {
            lines.push(Line::from(Span::styled(
                "Revealing batch ...",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "tab switch field · enter reveal · esc close",
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
