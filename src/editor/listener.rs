//! Change notifications the editor emits to its host.
//!
//! The host subscribes one or more [`EditorListener`]s. Two ready-made
//! implementations cover the common cases: [`CallbackListener`] wraps closures
//! and [`EventRecorder`] queues events for the host to drain later.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::model::{Annotation, Category};

/// Host-side receiver of editor notifications.
pub trait EditorListener {
    /// The annotation set of the active image changed; persist it.
    fn on_annotation_set_changed(&mut self, _annotations: &[Annotation]) {}

    /// The current drawing category changed; sync any selector UI.
    fn on_current_category_changed(&mut self, _category: &Category) {}
}

/// A notification, as recorded by [`EventRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    AnnotationSetChanged(Vec<Annotation>),
    CurrentCategoryChanged(Category),
}

/// Closure-backed listener.
#[derive(Default)]
pub struct CallbackListener {
    on_set_changed: Option<Box<dyn FnMut(&[Annotation])>>,
    on_category_changed: Option<Box<dyn FnMut(&Category)>>,
}

impl CallbackListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_set_changed<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[Annotation]) + 'static,
    {
        self.on_set_changed = Some(Box::new(callback));
        self
    }

    pub fn on_category_changed<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Category) + 'static,
    {
        self.on_category_changed = Some(Box::new(callback));
        self
    }
}

impl EditorListener for CallbackListener {
    fn on_annotation_set_changed(&mut self, annotations: &[Annotation]) {
        if let Some(callback) = self.on_set_changed.as_mut() {
            callback(annotations);
        }
    }

    fn on_current_category_changed(&mut self, category: &Category) {
        if let Some(callback) = self.on_category_changed.as_mut() {
            callback(category);
        }
    }
}

impl fmt::Debug for CallbackListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackListener")
            .field("on_set_changed", &self.on_set_changed.is_some())
            .field("on_category_changed", &self.on_category_changed.is_some())
            .finish()
    }
}

/// Queues every notification. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn set_changed_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, EditorEvent::AnnotationSetChanged(_)))
            .count()
    }

    pub fn category_changed_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, EditorEvent::CurrentCategoryChanged(_)))
            .count()
    }

    pub fn last_category(&self) -> Option<Category> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            EditorEvent::CurrentCategoryChanged(c) => Some(c.clone()),
            EditorEvent::AnnotationSetChanged(_) => None,
        })
    }
}

impl EditorListener for EventRecorder {
    fn on_annotation_set_changed(&mut self, annotations: &[Annotation]) {
        self.events
            .borrow_mut()
            .push(EditorEvent::AnnotationSetChanged(annotations.to_vec()));
    }

    fn on_current_category_changed(&mut self, category: &Category) {
        self.events
            .borrow_mut()
            .push(EditorEvent::CurrentCategoryChanged(category.clone()));
    }
}
