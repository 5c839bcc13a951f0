//! Keyboard dispatch.

use super::AnnotationEditor;
use crate::input::KeyEvent;
use crate::keybindings::EditorAction;

impl AnnotationEditor {
    /// Feed one key press. Returns true if the editor consumed it.
    ///
    /// Editing keys are ignored while a pointer gesture is in progress; only
    /// cancel gets through.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        let Some(action) = self.keybindings.action_for(&event) else {
            return false;
        };
        log::trace!("Key {:?} -> {:?}", event.key, action);

        if action == EditorAction::Cancel {
            if !self.cancel_draw() {
                self.clear_selection();
            }
            return true;
        }
        if self.gesture() != super::GestureKind::Idle {
            log::debug!("Ignoring {:?} during {:?}", action, self.gesture());
            return false;
        }

        self.apply_action(action, event.repeat);
        true
    }

    /// Run an action directly, as if its key had been pressed once.
    pub fn apply_action(&mut self, action: EditorAction, repeat: bool) {
        match action {
            EditorAction::Nudge { dx, dy } => {
                let step = self.prefs.nudge_step;
                self.nudge_selection(dx * step, dy * step, !repeat);
            }
            EditorAction::Delete => self.delete_selected(),
            EditorAction::Copy => self.copy_selection(),
            EditorAction::Paste => self.paste(),
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::SelectAll => self.select_all(),
            EditorAction::Cancel => {
                if !self.cancel_draw() {
                    self.clear_selection();
                }
            }
            EditorAction::SelectIndex(index) => self.select_index(index),
        }
    }
}
