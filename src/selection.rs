//! Primary + multi-selection set.
//!
//! Invariant: `primary` is a member of `set` whenever `set` is non-empty, and
//! `primary` is `None` whenever `set` is empty.

use std::collections::BTreeSet;

use crate::model::AnnotationId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    primary: Option<AnnotationId>,
    set: BTreeSet<AnnotationId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<AnnotationId> {
        self.primary
    }

    pub fn ids(&self) -> impl Iterator<Item = AnnotationId> + '_ {
        self.set.iter().copied()
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.set.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Plain click: select exactly `id`.
    pub fn select_only(&mut self, id: AnnotationId) {
        self.set.clear();
        self.set.insert(id);
        self.primary = Some(id);
    }

    /// Modifier click: toggle membership of `id`.
    ///
    /// A newly added member becomes primary; removing the primary promotes the
    /// first remaining member.
    pub fn toggle(&mut self, id: AnnotationId) {
        if self.set.remove(&id) {
            if self.primary == Some(id) {
                self.primary = self.set.first().copied();
            }
        } else {
            self.set.insert(id);
            self.primary = Some(id);
        }
    }

    /// Replace the selection with `ids`; the first id becomes primary.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = AnnotationId>) {
        let mut ids = ids.into_iter();
        self.set.clear();
        self.primary = None;
        if let Some(first) = ids.next() {
            self.primary = Some(first);
            self.set.insert(first);
            self.set.extend(ids);
        }
    }

    pub fn clear(&mut self) {
        self.set.clear();
        self.primary = None;
    }

    /// Drop ids that no longer exist.
    pub fn retain(&mut self, exists: impl Fn(AnnotationId) -> bool) {
        self.set.retain(|id| exists(*id));
        if self.primary.is_some_and(|p| !self.set.contains(&p)) {
            self.primary = self.set.first().copied();
        }
    }

    /// Check the selection invariant.
    pub fn is_consistent(&self) -> bool {
        match self.primary {
            Some(p) => self.set.contains(&p),
            None => self.set.is_empty(),
        }
    }
}
