//! Session-scoped copy/paste buffer.
//!
//! The buffer outlives any single image: it is created once by the host and
//! handed to every editor as a [`SharedClipboard`]. Everything runs on the UI
//! thread, so `Rc<RefCell<_>>` is enough.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{Annotation, AnnotationId};

/// Clipboard handle shared between editors of one session.
pub type SharedClipboard = Rc<RefCell<ClipboardBuffer>>;

#[derive(Debug, Clone, Default)]
pub struct ClipboardBuffer {
    entries: Vec<Annotation>,
}

impl ClipboardBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer wrapped for sharing.
    pub fn shared() -> SharedClipboard {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Overwrite the buffer with deep copies of `annotations`.
    pub fn store<'a>(&mut self, annotations: impl IntoIterator<Item = &'a Annotation>) {
        self.entries = annotations.into_iter().cloned().collect();
        log::debug!("Clipboard: stored {} annotations", self.entries.len());
    }

    pub fn entries(&self) -> &[Annotation] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Build fresh annotations from the buffer.
    ///
    /// Each copy is shifted by `offset` on both axes and takes `category_id`
    /// (the active drawing category) instead of its original category.
    pub fn instantiate(
        &self,
        offset: f32,
        category_id: i32,
        mut next_id: impl FnMut() -> AnnotationId,
    ) -> Vec<Annotation> {
        self.entries
            .iter()
            .map(|entry| Annotation {
                id: next_id(),
                name: entry.name.clone(),
                bbox: entry.bbox.translated(offset, offset),
                category_id,
            })
            .collect()
    }
}
