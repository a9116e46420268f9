//! Key handling: maps terminal keys to actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::study::Tab;

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,

    // Selection
    Select,
    Back,
    Home,

    // Tabs
    NextTab,
    PrevTab,
    GoToTab(Tab),

    // Text entry
    Insert(char),
    DeleteBack,
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorStart,
    CursorEnd,

    // Study
    Search,
    Copy,
    Diagram,
    CycleModel,

    Quit,
}

/// Keys that work everywhere, even while typing
fn global_action(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('g') => Some(Action::Home),
            KeyCode::Char('d') => Some(Action::HalfPageDown),
            KeyCode::Char('u') => Some(Action::HalfPageUp),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Tab => Some(Action::NextTab),
        KeyCode::BackTab => Some(Action::PrevTab),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        _ => None,
    }
}

/// Keys while a text field has focus
fn text_entry_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(c) => Some(Action::Insert(c)),
        KeyCode::Backspace => Some(Action::DeleteBack),
        KeyCode::Delete => Some(Action::DeleteForward),
        KeyCode::Left => Some(Action::CursorLeft),
        KeyCode::Right => Some(Action::CursorRight),
        KeyCode::Home => Some(Action::CursorStart),
        KeyCode::End => Some(Action::CursorEnd),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),
        _ => None,
    }
}

/// Vim-style key mapping (basic, without modifiers)
pub fn vim_key_to_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Char('h') => Some(Action::Back),
        KeyCode::Char('l') => Some(Action::Select),
        KeyCode::Char('g') => Some(Action::Top),
        KeyCode::Char('G') => Some(Action::Bottom),
        _ => None,
    }
}

/// Keys outside text entry
fn normal_action(code: KeyCode, vim_keys: bool) -> Option<Action> {
    if vim_keys {
        if let Some(action) = vim_key_to_action(code) {
            return Some(action);
        }
    }
    match code {
        KeyCode::Down => Some(Action::Down),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Home => Some(Action::Top),
        KeyCode::End => Some(Action::Bottom),
        KeyCode::Enter | KeyCode::Right => Some(Action::Select),
        KeyCode::Esc | KeyCode::Left | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Char('/') => Some(Action::Search),
        KeyCode::Char('c') | KeyCode::Char('y') => Some(Action::Copy),
        KeyCode::Char('d') => Some(Action::Diagram),
        KeyCode::Char('m') => Some(Action::CycleModel),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('1') => Some(Action::GoToTab(Tab::Study)),
        KeyCode::Char('2') => Some(Action::GoToTab(Tab::Chat)),
        KeyCode::Char('3') => Some(Action::GoToTab(Tab::Settings)),
        _ => None,
    }
}

/// Map a key press to an action
///
/// `text_entry` is true while a text field (topic search, chat input) has
/// focus; letters are then typed rather than treated as commands.
pub fn key_to_action(key: KeyEvent, text_entry: bool, vim_keys: bool) -> Option<Action> {
    if let Some(action) = global_action(&key) {
        return Some(action);
    }
    if text_entry {
        text_entry_action(key.code)
    } else {
        normal_action(key.code, vim_keys)
    }
}
