//! Application state and event handling

pub mod controller;
pub mod input;
pub mod state;
pub mod tasks;
pub mod terminal;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::gemini::GenerationBackend;
use crate::theme::Theme;
use crate::ui;
use crate::ui::diagram::DiagramCache;
use controller::{Controller, Flow};
use input::key_to_action;
use terminal::TerminalGuard;

/// How long to wait for a key before redrawing
const FRAME: Duration = Duration::from_millis(16);

/// The main application
pub struct App<B> {
    controller: Controller<B>,
    terminal: TerminalGuard,
    theme: Theme,
    diagrams: DiagramCache,
}

impl<B: GenerationBackend> App<B> {
    /// Take over the terminal
    pub fn new(controller: Controller<B>) -> Result<Self> {
        let terminal = TerminalGuard::new()?;
        // Graphics detection queries the terminal, so it must follow setup
        let diagrams = DiagramCache::new();
        Ok(Self { controller, terminal, theme: Theme::default(), diagrams })
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.controller.drain_events();

            let theme = &self.theme;
            let diagrams = &mut self.diagrams;
            let controller = &mut self.controller;
            self.terminal.terminal().draw(|frame| {
                ui::draw(frame, &mut controller.screen(), theme, diagrams);
            })?;

            if !event::poll(FRAME)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let text_entry = self.controller.text_entry();
            let vim_keys = self.controller.config().vim_keys;
            let Some(action) = key_to_action(key, text_entry, vim_keys) else {
                continue;
            };
            match self.controller.handle_action(action) {
                Flow::Continue => {}
                Flow::Quit => break,
                Flow::Copy(text) => self.copy_to_clipboard(&text),
            }
        }
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let status = &mut self.controller.ui_mut().status;
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text) {
                Ok(()) => status
                    .set_message(format!("Copied {} characters to clipboard", text.chars().count())),
                Err(e) => {
                    tracing::warn!("Clipboard write failed: {}", e);
                    status.set_error(format!("Clipboard error: {e}"));
                }
            },
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                status.set_error(format!("Clipboard unavailable: {e}"));
            }
        }
    }
}

/// Show a configuration error until the user dismisses it
pub fn run_fatal(message: &str) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let theme = Theme::default();
    loop {
        guard.terminal().draw(|frame| ui::fatal::draw(frame, message, &theme))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl_c =
                key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
            if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                return Ok(());
            }
        }
    }
}
