//! Currency picker overlay
//!
//! Presents the chain's native token plus a small table of well-known
//! token deployments, with a free-form entry for any other address.
//! The zero address is folded into the native-token sentinel.

use std::str::FromStr;

use alloy_primitives::{address, Address};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::CurrencySpec;
use crate::core::{Action, Chain, Context, Module};

/// Sentinel address every supported chain uses for its native token.
pub const NATIVE_TOKEN: Address = address!("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyMeta {
    pub address: Address,
    pub symbol: String,
    pub name: String,
}

impl CurrencyMeta {
    fn new(address: Address, symbol: &str, name: &str) -> Self {
        Self {
            address,
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    /// "SYMBOL (Name)", the display format used everywhere a currency
    /// is shown.
    pub fn display(&self) -> String {
        format!("{} ({})", self.symbol, self.name)
    }
}

/// Fold the zero address into the native-token sentinel.
pub fn normalize(address: Address) -> Address {
    if address == Address::ZERO {
        NATIVE_TOKEN
    } else {
        address
    }
}

fn native_name(chain: Chain) -> &'static str {
    match chain {
        Chain::Mainnet | Chain::Rinkeby | Chain::Goerli => "Ether",
        Chain::Polygon | Chain::Mumbai => "Matic",
        Chain::Avalanche => "Avalanche",
        Chain::Fantom => "Fantom",
    }
}

/// Well-known token deployments per chain, native token first.
pub fn builtin_currencies(chain: Chain) -> Vec<CurrencyMeta> {
    let mut list = vec![CurrencyMeta::new(
        NATIVE_TOKEN,
        chain.native_symbol(),
        native_name(chain),
    )];
    match chain {
        Chain::Mainnet => {
            list.push(CurrencyMeta::new(
                address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                "WETH",
                "Wrapped Ether",
            ));
            list.push(CurrencyMeta::new(
                address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
                "USDC",
                "USD Coin",
            ));
            list.push(CurrencyMeta::new(
                address!("0x6B175474E89094C44Da98b954EedeAC495271d0F"),
                "DAI",
                "Dai Stablecoin",
            ));
            list.push(CurrencyMeta::new(
                address!("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
                "USDT",
                "Tether USD",
            ));
        }
        Chain::Polygon => {
            list.push(CurrencyMeta::new(
                address!("0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
                "WMATIC",
                "Wrapped Matic",
            ));
            list.push(CurrencyMeta::new(
                address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
                "USDC",
                "USD Coin",
            ));
        }
        Chain::Avalanche => {
            list.push(CurrencyMeta::new(
                address!("0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7"),
                "WAVAX",
                "Wrapped AVAX",
            ));
        }
        Chain::Fantom => {
            list.push(CurrencyMeta::new(
                address!("0x21be370D5312f44cB42ce377BC9b8a0cEF1A4C83"),
                "WFTM",
                "Wrapped Fantom",
            ));
        }
        Chain::Rinkeby | Chain::Goerli | Chain::Mumbai => {}
    }
    list
}

fn short_label(address: &Address) -> String {
    let hex = format!("{:#x}", address);
    format!("{}..{}", &hex[..6], &hex[hex.len() - 4..])
}

pub struct CurrencyPicker {
    chain: Chain,
    entries: Vec<CurrencyMeta>,
    cursor: usize,
    /// Some while the free-form address field has focus
    custom: Option<String>,
}

impl CurrencyPicker {
    pub fn new(chain: Chain, extras: &[CurrencySpec]) -> Self {
        let mut entries = builtin_currencies(chain);
        for spec in extras.iter().filter(|s| s.chain == chain) {
            let Ok(address) = Address::from_str(spec.normalized_address().as_str()) else {
                continue;
            };
            let address = normalize(address);
            if entries.iter().any(|e| e.address == address) {
                continue;
            }
            entries.push(CurrencyMeta {
                address,
                symbol: spec.display_symbol(),
                name: spec.name.clone().unwrap_or_else(|| "Custom".to_string()),
            });
        }
        Self {
            chain,
            entries,
            cursor: 0,
            custom: None,
        }
    }

    pub fn entries(&self) -> &[CurrencyMeta] {
        &self.entries
    }

    fn select_cursor(&self) -> Action {
        match self.entries.get(self.cursor) {
            Some(meta) => Action::SelectCurrency {
                chain: self.chain,
                address: meta.address,
                label: meta.display(),
            },
            None => Action::None,
        }
    }

    /// Accept the free-form field. Anything that does not parse as an
    /// address is ignored, nothing is selected.
    fn accept_custom(&mut self) -> Action {
        let Some(buffer) = self.custom.as_ref() else {
            return Action::None;
        };
        let Ok(address) = Address::from_str(buffer.trim()) else {
            return Action::None;
        };
        let address = normalize(address);
        self.custom = None;
        let label = self
            .entries
            .iter()
            .find(|e| e.address == address)
            .map(|e| e.display())
            .unwrap_or_else(|| short_label(&address));
        Action::SelectCurrency {
            chain: self.chain,
            address,
            label,
        }
    }
}

impl Module for CurrencyPicker {
    fn title(&self) -> String {
        format!("Currency - {}", self.chain.name())
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Context) -> Action {
        if let Some(buffer) = self.custom.as_mut() {
            return match key.code {
                KeyCode::Esc => {
                    self.custom = None;
                    Action::None
                }
                KeyCode::Enter => self.accept_custom(),
                KeyCode::Backspace => {
                    buffer.pop();
                    Action::None
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    Action::None
                }
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::CloseOverlay,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < self.entries.len() {
                    self.cursor += 1;
                }
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Char('c') => {
                self.custom = Some(String::new());
                Action::None
            }
            KeyCode::Enter => self.select_cursor(),
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &Context) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(Style::default().fg(Color::Cyan));

        let mut lines: Vec<Line> = Vec::new();
        for (idx, meta) in self.entries.iter().enumerate() {
            let mut style = Style::default();
            if idx == self.cursor && self.custom.is_none() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let suffix = if meta.address == NATIVE_TOKEN {
                "  native".to_string()
            } else {
                format!("  {}", short_label(&meta.address))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", meta.display()), style),
                Span::styled(suffix, Style::default().fg(Color::DarkGray)),
            ]));
        }

        lines.push(Line::default());
        match &self.custom {
            Some(buffer) => {
                lines.push(Line::from(vec![
                    Span::styled("Custom address: ", Style::default().fg(Color::Cyan)),
                    Span::raw(buffer.clone()),
                    Span::styled("█", Style::default().fg(Color::Cyan)),
                ]));
                lines.push(Line::from(Span::styled(
                    "enter accept (valid address only) · esc back",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "enter select · c custom address · esc close",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
