//! TEA Message Types for the TUI
//!
//! This module defines the Msg enum representing all possible user actions.
//! Following The Elm Architecture (TEA), messages are:
//! - Data describing what happened (not how to handle it)
//! - The only way to trigger state changes
//! - Processed by a single update function

use crossterm::event::{KeyCode, KeyModifiers, MouseEvent};

/// All possible messages/actions in the TUI
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // === Navigation ===
    /// Move the row cursor up by one
    MoveUp,
    /// Move the row cursor down by one
    MoveDown,
    PageUp,
    PageDown,
    JumpToTop,
    JumpToBottom,
    /// Scroll the grid horizontally
    ScrollLeft,
    ScrollRight,

    // === Rows ===
    /// Click the row under the cursor (marks it as last clicked)
    ActivateRow,
    /// Click a row by its index among the laid-out rows
    ClickRow(usize),
    /// Expand/collapse the row under the cursor
    ToggleOpen,

    // === Highlighter ===
    /// Toggle the N-th tag chip (0-based)
    ToggleTag(usize),
    ToggleErrorOnly,
    ClearFilters,
    NextMatch,
    PrevMatch,

    // === Keyword Input ===
    /// Start editing the keyword
    StartSearch,
    SearchInput(char),
    SearchBackspace,
    /// Keep the edited keyword
    SearchConfirm,
    /// Restore the keyword from before editing
    SearchCancel,

    // === Display ===
    ToggleLocale,
    ToggleToolbar,
    ToggleHelp,
    CloseModal,

    // === Lifecycle ===
    /// Reload the data source
    Reload,
    Quit,
    Tick,
    Resize(u16, u16),
    Mouse(MouseEvent),

    // === Internal ===
    /// No operation (for unhandled keys)
    Noop,
}

/// Convert a key event to a message
///
/// This is a pure function - no side effects, just pattern matching.
pub fn key_to_msg(
    code: KeyCode,
    modifiers: KeyModifiers,
    help_open: bool,
    search_active: bool,
) -> Msg {
    // Handle search mode first
    if search_active {
        return match code {
            KeyCode::Enter => Msg::SearchConfirm,
            KeyCode::Esc => Msg::SearchCancel,
            KeyCode::Backspace => Msg::SearchBackspace,
            KeyCode::Char(c) => Msg::SearchInput(c),
            _ => Msg::Noop,
        };
    }

    if help_open {
        return match code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Msg::CloseModal,
            _ => Msg::Noop,
        };
    }

    match code {
        // Quit
        KeyCode::Char('q') => Msg::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Msg::Quit,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => Msg::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Msg::MoveUp,
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => Msg::PageDown,
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => Msg::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Msg::JumpToTop,
        KeyCode::Char('G') | KeyCode::End => Msg::JumpToBottom,
        KeyCode::PageDown => Msg::PageDown,
        KeyCode::PageUp => Msg::PageUp,
        KeyCode::Char('h') | KeyCode::Left => Msg::ScrollLeft,
        KeyCode::Char('l') | KeyCode::Right => Msg::ScrollRight,

        // Rows
        KeyCode::Enter => Msg::ActivateRow,
        KeyCode::Char(' ') => Msg::ToggleOpen,

        // Highlighter
        KeyCode::Char(c @ '1'..='9') => Msg::ToggleTag(c as usize - '1' as usize),
        KeyCode::Char('e') => Msg::ToggleErrorOnly,
        KeyCode::Char('n') => Msg::NextMatch,
        KeyCode::Char('N') => Msg::PrevMatch,
        KeyCode::Char('C') => Msg::ClearFilters,
        KeyCode::Char('/') => Msg::StartSearch,

        // Display
        KeyCode::Char('L') => Msg::ToggleLocale,
        KeyCode::Char('H') => Msg::ToggleToolbar,
        KeyCode::Char('?') => Msg::ToggleHelp,
        KeyCode::Esc => Msg::CloseModal,

        KeyCode::Char('r') => Msg::Reload,

        _ => Msg::Noop,
    }
}

/// Check if a message is a cursor movement
pub fn is_navigation(msg: &Msg) -> bool {
    matches!(
        msg,
        Msg::MoveUp
            | Msg::MoveDown
            | Msg::PageUp
            | Msg::PageDown
            | Msg::JumpToTop
            | Msg::JumpToBottom
            | Msg::ClickRow(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Msg {
        key_to_msg(code, KeyModifiers::NONE, false, false)
    }

    #[test]
    fn test_key_to_msg_navigation() {
        assert_eq!(key(KeyCode::Char('j')), Msg::MoveDown);
        assert_eq!(key(KeyCode::Char('k')), Msg::MoveUp);
        assert_eq!(key(KeyCode::Down), Msg::MoveDown);
        assert_eq!(key(KeyCode::Char('G')), Msg::JumpToBottom);
        assert_eq!(key(KeyCode::Char('l')), Msg::ScrollRight);
        assert_eq!(
            key_to_msg(KeyCode::Char('d'), KeyModifiers::CONTROL, false, false),
            Msg::PageDown
        );
    }

    #[test]
    fn test_key_to_msg_quit() {
        assert_eq!(key(KeyCode::Char('q')), Msg::Quit);
        assert_eq!(
            key_to_msg(KeyCode::Char('c'), KeyModifiers::CONTROL, false, false),
            Msg::Quit
        );
    }

    #[test]
    fn test_key_to_msg_highlighter() {
        assert_eq!(key(KeyCode::Char('1')), Msg::ToggleTag(0));
        assert_eq!(key(KeyCode::Char('9')), Msg::ToggleTag(8));
        assert_eq!(key(KeyCode::Char('e')), Msg::ToggleErrorOnly);
        assert_eq!(key(KeyCode::Char('n')), Msg::NextMatch);
        assert_eq!(key(KeyCode::Char('N')), Msg::PrevMatch);
        assert_eq!(key(KeyCode::Char('C')), Msg::ClearFilters);
        assert_eq!(key(KeyCode::Char('/')), Msg::StartSearch);
        assert_eq!(key(KeyCode::Char('0')), Msg::Noop);
    }

    #[test]
    fn test_key_to_msg_rows() {
        assert_eq!(key(KeyCode::Enter), Msg::ActivateRow);
        assert_eq!(key(KeyCode::Char(' ')), Msg::ToggleOpen);
    }

    #[test]
    fn test_key_to_msg_search_mode() {
        assert_eq!(
            key_to_msg(KeyCode::Char('q'), KeyModifiers::NONE, false, true),
            Msg::SearchInput('q')
        );
        assert_eq!(
            key_to_msg(KeyCode::Enter, KeyModifiers::NONE, false, true),
            Msg::SearchConfirm
        );
        assert_eq!(
            key_to_msg(KeyCode::Esc, KeyModifiers::NONE, false, true),
            Msg::SearchCancel
        );
    }

    #[test]
    fn test_key_to_msg_help_open() {
        assert_eq!(
            key_to_msg(KeyCode::Char('j'), KeyModifiers::NONE, true, false),
            Msg::Noop
        );
        assert_eq!(
            key_to_msg(KeyCode::Esc, KeyModifiers::NONE, true, false),
            Msg::CloseModal
        );
    }

    #[test]
    fn test_message_classes() {
        assert!(is_navigation(&Msg::ClickRow(3)));
        assert!(!is_navigation(&Msg::NextMatch));
    }
}
