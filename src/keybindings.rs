//! Customizable keybindings for the editor.
//!
//! Maps key presses to [`EditorAction`]s. Defaults follow common desktop
//! conventions (Ctrl+C/V/Z/Y/A, arrows, Delete, digits).

use serde::{Deserialize, Serialize};

use crate::input::{KeyCode, KeyEvent, Modifiers};

/// Maximum number of annotations reachable by digit hotkeys (1-9, 0).
pub const MAX_INDEX_HOTKEYS: usize = 10;

/// A key plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: KeyCode,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyChord {
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub const fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
        }
    }

    pub const fn ctrl_shift(key: KeyCode) -> Self {
        Self {
            key,
            ctrl: true,
            shift: true,
        }
    }

    /// Exact match on key, Ctrl and Shift. Alt is ignored.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.key && self.ctrl == event.modifiers.ctrl && self.shift == event.modifiers.shift
    }
}

/// Something the editor does in response to a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorAction {
    /// Move the selection by this many steps on each axis
    Nudge { dx: f32, dy: f32 },
    Delete,
    Copy,
    Paste,
    Undo,
    Redo,
    SelectAll,
    /// Abort an in-progress draw, otherwise clear the selection
    Cancel,
    /// Select the Nth annotation (0-based) in host order
    SelectIndex(usize),
}

/// Keybinding configuration for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub copy: KeyChord,
    pub paste: KeyChord,
    pub undo: KeyChord,
    /// Every chord here triggers redo
    pub redo: Vec<KeyChord>,
    pub select_all: KeyChord,
    pub delete: Vec<KeyChord>,
    pub cancel: KeyChord,

    /// Hotkeys for selecting the Nth annotation (index 0 = first)
    pub index_hotkeys: [Option<KeyCode>; MAX_INDEX_HOTKEYS],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            copy: KeyChord::ctrl(KeyCode::C),
            paste: KeyChord::ctrl(KeyCode::V),
            undo: KeyChord::ctrl(KeyCode::Z),
            redo: vec![
                KeyChord::ctrl(KeyCode::Y),
                KeyChord::ctrl_shift(KeyCode::Z),
            ],
            select_all: KeyChord::ctrl(KeyCode::A),
            delete: vec![
                KeyChord::plain(KeyCode::Delete),
                KeyChord::plain(KeyCode::Backspace),
            ],
            cancel: KeyChord::plain(KeyCode::Escape),

            // 1-9 then 0 for the first ten annotations
            index_hotkeys: [
                Some(KeyCode::Key1),
                Some(KeyCode::Key2),
                Some(KeyCode::Key3),
                Some(KeyCode::Key4),
                Some(KeyCode::Key5),
                Some(KeyCode::Key6),
                Some(KeyCode::Key7),
                Some(KeyCode::Key8),
                Some(KeyCode::Key9),
                Some(KeyCode::Key0),
            ],
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a key press to an action, if any.
    pub fn action_for(&self, event: &KeyEvent) -> Option<EditorAction> {
        if self.copy.matches(event) {
            return Some(EditorAction::Copy);
        }
        if self.paste.matches(event) {
            return Some(EditorAction::Paste);
        }
        if self.undo.matches(event) {
            return Some(EditorAction::Undo);
        }
        if self.redo.iter().any(|chord| chord.matches(event)) {
            return Some(EditorAction::Redo);
        }
        if self.select_all.matches(event) {
            return Some(EditorAction::SelectAll);
        }
        if self.delete.iter().any(|chord| chord.matches(event)) {
            return Some(EditorAction::Delete);
        }
        if self.cancel.matches(event) {
            return Some(EditorAction::Cancel);
        }

        if event.modifiers == Modifiers::NONE {
            if let Some(action) = nudge_for(event.key) {
                return Some(action);
            }
            if let Some(index) = self.index_for_key(event.key) {
                return Some(EditorAction::SelectIndex(index));
            }
        }
        None
    }

    /// Get the annotation index (0-based) bound to a key, if any.
    pub fn index_for_key(&self, key: KeyCode) -> Option<usize> {
        self.index_hotkeys
            .iter()
            .position(|hotkey| *hotkey == Some(key))
    }

    /// Set the hotkey for an annotation index.
    pub fn set_index_key(&mut self, index: usize, key: Option<KeyCode>) {
        if index < MAX_INDEX_HOTKEYS {
            self.index_hotkeys[index] = key;
        }
    }
}

fn nudge_for(key: KeyCode) -> Option<EditorAction> {
    let (dx, dy) = match key {
        KeyCode::ArrowLeft => (-1.0, 0.0),
        KeyCode::ArrowRight => (1.0, 0.0),
        KeyCode::ArrowUp => (0.0, -1.0),
        KeyCode::ArrowDown => (0.0, 1.0),
        _ => return None,
    };
    Some(EditorAction::Nudge { dx, dy })
}
