//! Undo/Redo history for annotation edits.
//!
//! Every undoable step stores a deep snapshot of the whole annotation list of
//! the active image. This is O(n) per step, which is fine for the per-image
//! counts an annotator deals with.

use crate::constants::UNDO_HISTORY_SIZE;
use crate::model::Annotation;

/// A deep copy of the annotation list at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    annotations: Vec<Annotation>,
}

impl Snapshot {
    pub fn capture(annotations: &[Annotation]) -> Self {
        Self {
            annotations: annotations.to_vec(),
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }
}

/// Configuration for the history stacks
#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Maximum number of snapshots to keep on the undo stack
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: UNDO_HISTORY_SIZE,
        }
    }
}

/// Bounded undo/redo snapshot stacks.
///
/// - `undo_stack`: states to go back to (most recent at the end)
/// - `redo_stack`: states undone since the last push (most recent at the end)
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    config: UndoConfig,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Record the state *before* a mutation.
    ///
    /// Clears the redo stack and drops the oldest snapshots past the limit.
    pub fn push(&mut self, annotations: &[Annotation]) {
        self.undo_stack.push(Snapshot::capture(annotations));
        self.redo_stack.clear();

        while self.undo_stack.len() > self.config.max_history {
            self.undo_stack.remove(0);
        }
        log::debug!(
            "Undo: pushed snapshot of {} annotations (depth {})",
            annotations.len(),
            self.undo_stack.len()
        );
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Step back. `current` goes onto the redo stack; returns the state to install.
    pub fn undo(&mut self, current: &[Annotation]) -> Option<Vec<Annotation>> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot::capture(current));
        log::debug!("Undo: restored {} annotations", snapshot.annotations().len());
        Some(snapshot.into_annotations())
    }

    /// Step forward. `current` goes back onto the undo stack.
    pub fn redo(&mut self, current: &[Annotation]) -> Option<Vec<Annotation>> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot::capture(current));
        log::debug!("Redo: restored {} annotations", snapshot.annotations().len());
        Some(snapshot.into_annotations())
    }

    /// Drop pending redo states after an unrecorded mutation.
    pub fn clear_redo(&mut self) {
        if !self.redo_stack.is_empty() {
            log::debug!("Redo: discarded {} states", self.redo_stack.len());
            self.redo_stack.clear();
        }
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("Undo history cleared");
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_history(&self) -> usize {
        self.config.max_history
    }
}
