use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Archive the current item
    Archive,
    /// Keep the current item where it is
    Skip,
    /// Open the folder picker for the current item
    MoveToFolder,
    /// Put the cursor on the next item
    Next,
    /// Put the cursor on the previous item
    Previous,
    /// Reset the item at the cursor to unprocessed
    Reset,
    /// Show archived items
    ShowArchived,
    /// Toggle help overlay
    Help,
    /// List navigation inside an overlay
    Up,
    Down,
    /// Activate the selected list entry
    Select,
    /// Start typing a new folder name
    NewFolder,
    /// Restore the selected archived item
    Restore,
    /// Delete the selected archived item
    Delete,
    RestoreAll,
    DeleteAll,
    /// Confirm a destructive action
    Confirm,
    /// Close an overlay or cancel a dialog
    Cancel,
    /// No action
    None,
}

/// Maps keyboard events to actions in the main browsing view
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Archive: Left arrow or a
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Archive,
        (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::Archive,

        // Skip: Right arrow or s
        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Skip,
        (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::Skip,

        // Move: Up arrow or m
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::MoveToFolder,
        (KeyCode::Char('m'), KeyModifiers::NONE) => KeyAction::MoveToFolder,

        // Cursor
        (KeyCode::Char(']'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('['), KeyModifiers::NONE) => KeyAction::Previous,

        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Reset,
        (KeyCode::Char('v'), KeyModifiers::NONE) => KeyAction::ShowArchived,
        (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events inside the folder picker
pub fn handle_picker_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Down,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Select,
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::NewFolder,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Cancel,
        _ => KeyAction::None,
    }
}

/// Maps keyboard events inside the archived items view
pub fn handle_archived_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Down,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Restore,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,
        // Shifted letters may or may not carry the SHIFT modifier
        (KeyCode::Char('R'), _) => KeyAction::RestoreAll,
        (KeyCode::Char('D'), _) => KeyAction::DeleteAll,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('v'), KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Cancel,
        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions
/// Used when ViewState is ConfirmDelete
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), _) => KeyAction::Confirm,
        (KeyCode::Char('Y'), _) => KeyAction::Confirm,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Confirm,

        // Cancel: n or Esc
        (KeyCode::Char('n'), _) => KeyAction::Cancel,
        (KeyCode::Char('N'), _) => KeyAction::Cancel,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,

        _ => KeyAction::None,
    }
}

/// Edit applied to a text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
    None,
}

/// Maps keyboard events while typing a folder name
pub fn handle_text_input(key: KeyEvent) -> TextInput {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => TextInput::Submit,
        (KeyCode::Esc, _) => TextInput::Cancel,
        (KeyCode::Backspace, _) => TextInput::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            TextInput::Insert(c)
        }
        _ => TextInput::None,
    }
}
