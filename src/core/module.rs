//! Module trait for interactive overlays

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::core::action::Action;
use crate::core::context::Context;

/// An interactive overlay. It owns its state, consumes key events while
/// open, and renders into the popup area the layout hands it.
pub trait Module {
    /// Title shown on the overlay border
    fn title(&self) -> String;

    /// Handle a key event while the overlay has focus
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action;

    /// Render into the given popup area
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context);
}
