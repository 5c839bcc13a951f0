//! The interactive annotation editor.
//!
//! [`AnnotationEditor`] owns the annotation set of the active image and turns
//! pointer, wheel and keyboard events into edits. It ties together the
//! coordinate mapper, hit-tester, selection, history, clipboard and palette,
//! and notifies subscribed [`EditorListener`]s after every completed edit.
//!
//! Everything here runs synchronously on the host's UI thread.

mod gesture;
mod keyboard;
mod listener;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

pub use gesture::{GestureKind, GestureState};
pub use listener::{CallbackListener, EditorEvent, EditorListener, EventRecorder};

use crate::clipboard::SharedClipboard;
use crate::config::{EditorConfig, EditorPreferences};
use crate::constants::UNASSIGNED_CATEGORY_ID;
use crate::hit_test::HitTester;
use crate::keybindings::KeyBindings;
use crate::mapper::CoordinateMapper;
use crate::model::{Annotation, AnnotationId, BoundingBox, Category, Point};
use crate::palette::{ClassPalette, CycleDirection};
use crate::selection::SelectionModel;
use crate::undo::{HistoryManager, UndoConfig};
use crate::zoom_math::ZoomTransform;

/// One annotation as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub id: AnnotationId,
    /// Screen-space rectangle (display space with zoom applied)
    pub rect: BoundingBox,
    pub color: [u8; 3],
    pub selected: bool,
    pub primary: bool,
}

pub struct AnnotationEditor {
    prefs: EditorPreferences,
    keybindings: KeyBindings,

    annotations: Vec<Annotation>,
    next_id: AnnotationId,
    /// Host-defined enumeration order for index hotkeys
    host_order: Option<Vec<AnnotationId>>,

    selection: SelectionModel,
    history: HistoryManager,
    clipboard: SharedClipboard,
    palette: ClassPalette,

    mapper: CoordinateMapper,
    zoom: ZoomTransform,
    hit_tester: HitTester,

    gesture: GestureState,
    /// Last pointer position in display space
    last_pointer: Point,

    listeners: Vec<Box<dyn EditorListener>>,
}

impl AnnotationEditor {
    pub fn new(config: &EditorConfig, clipboard: SharedClipboard) -> Self {
        let prefs = config.preferences.clone();
        Self {
            history: HistoryManager::with_config(UndoConfig {
                max_history: prefs.undo_history_size,
            }),
            hit_tester: HitTester::new(prefs.handle_size),
            keybindings: config.keybindings.clone(),
            palette: ClassPalette::new(config.categories.clone()),
            prefs,
            annotations: Vec::new(),
            next_id: 1,
            host_order: None,
            selection: SelectionModel::new(),
            clipboard,
            mapper: CoordinateMapper::default(),
            zoom: ZoomTransform::identity(),
            gesture: GestureState::Idle,
            last_pointer: Point::default(),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn EditorListener>) {
        self.listeners.push(listener);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn palette(&self) -> &ClassPalette {
        &self.palette
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    pub fn gesture(&self) -> GestureKind {
        self.gesture.kind()
    }

    pub fn preferences(&self) -> &EditorPreferences {
        &self.prefs
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    fn current_category_id(&self) -> i32 {
        self.palette.current_id().unwrap_or(UNASSIGNED_CATEGORY_ID)
    }

    // ------------------------------------------------------------------
    // Host-driven setup
    // ------------------------------------------------------------------

    /// Swap in the annotation set of another image.
    ///
    /// Any in-progress gesture is dropped without emitting. History, selection
    /// and zoom reset. Returns the outgoing set so the host can persist it.
    pub fn activate_image(
        &mut self,
        image_width: f32,
        image_height: f32,
        annotations: Vec<Annotation>,
    ) -> Vec<Annotation> {
        if !matches!(self.gesture, GestureState::Idle) {
            log::debug!("Dropping {:?} gesture on image switch", self.gesture.kind());
        }
        self.gesture = GestureState::Idle;
        self.mapper.set_image_size(image_width, image_height);
        self.zoom = ZoomTransform::identity();
        self.selection.clear();
        self.history.clear();
        self.host_order = None;

        let incoming = self.adopt(annotations);
        let outgoing = std::mem::replace(&mut self.annotations, incoming);
        log::info!(
            "Activated {}x{} image with {} annotations (handing back {})",
            image_width,
            image_height,
            self.annotations.len(),
            outgoing.len()
        );
        outgoing
    }

    /// Replace the live set with a host-computed one (e.g. pre-label results
    /// for the open image). Pushes one history entry; does not notify.
    pub fn refresh_annotations(&mut self, annotations: Vec<Annotation>) {
        self.history.push(&self.annotations);
        self.annotations = self.adopt(annotations);
        let annotations = &self.annotations;
        self.selection
            .retain(|id| annotations.iter().any(|a| a.id == id));
        log::debug!("Refreshed annotation set ({} entries)", self.annotations.len());
    }

    /// Give every incoming annotation a unique id and advance `next_id`.
    fn adopt(&mut self, mut annotations: Vec<Annotation>) -> Vec<Annotation> {
        let mut seen = HashSet::new();
        let max_id = annotations.iter().map(|a| a.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id.saturating_add(1));
        for ann in &mut annotations {
            if ann.id == 0 || !seen.insert(ann.id) {
                ann.id = self.allocate_id();
                seen.insert(ann.id);
            }
        }
        annotations
    }

    fn allocate_id(&mut self) -> AnnotationId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn set_display_size(&mut self, width: f32, height: f32) {
        self.mapper.set_display_size(width, height);
    }

    /// Order used by index hotkeys; defaults to insertion order.
    pub fn set_host_order(&mut self, order: Vec<AnnotationId>) {
        self.host_order = Some(order);
    }

    /// Replace the category list, moving the current pointer if needed.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        if let Some(current) = self.palette.set_available(categories).cloned() {
            self.emit_category_changed(&current);
        }
    }

    /// Make `id` the current drawing category.
    pub fn set_current_category(&mut self, id: i32) {
        if let Some(current) = self.palette.select_current(id).cloned() {
            log::debug!("Current category -> {} ({})", current.id, current.name);
            self.emit_category_changed(&current);
        }
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Remove every selected annotation.
    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.history.push(&self.annotations);
        let selection = &self.selection;
        self.annotations.retain(|a| !selection.contains(a.id));
        log::info!("Deleted {} annotations", self.selection.len());
        self.selection.clear();
        self.emit_set_changed();
    }

    /// Copy the selection (or the primary alone) into the session clipboard.
    pub fn copy_selection(&mut self) {
        let mut ids: Vec<AnnotationId> = self.selection.ids().collect();
        if ids.is_empty() {
            ids.extend(self.selection.primary());
        }
        if ids.is_empty() {
            return;
        }
        let copied = self.annotations.iter().filter(|a| ids.contains(&a.id));
        self.clipboard.borrow_mut().store(copied);
    }

    /// Paste the clipboard contents, offset and recategorized to the current
    /// drawing category. The pasted boxes become the selection.
    pub fn paste(&mut self) {
        if self.clipboard.borrow().is_empty() {
            return;
        }
        self.history.push(&self.annotations);

        let category_id = self.current_category_id();
        let offset = self.prefs.paste_offset;
        let clipboard = std::rc::Rc::clone(&self.clipboard);
        let pasted = clipboard
            .borrow()
            .instantiate(offset, category_id, || self.allocate_id());

        self.selection.select_all(pasted.iter().map(|a| a.id));
        log::info!("Pasted {} annotations as category {}", pasted.len(), category_id);
        self.annotations.extend(pasted);
        self.emit_set_changed();
    }

    pub fn undo(&mut self) {
        if let Some(state) = self.history.undo(&self.annotations) {
            self.annotations = state;
            self.selection.clear();
            self.emit_set_changed();
        }
    }

    pub fn redo(&mut self) {
        if let Some(state) = self.history.redo(&self.annotations) {
            self.annotations = state;
            self.selection.clear();
            self.emit_set_changed();
        }
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.annotations.iter().map(|a| a.id));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select the Nth annotation in host order. Out-of-range is ignored.
    pub fn select_index(&mut self, index: usize) {
        let id = match &self.host_order {
            Some(order) => order
                .iter()
                .filter(|id| self.annotations.iter().any(|a| a.id == **id))
                .nth(index)
                .copied(),
            None => self.annotations.get(index).map(|a| a.id),
        };
        if let Some(id) = id {
            self.selection.select_only(id);
        }
    }

    /// Move the selection by `(dx, dy)` image pixels.
    ///
    /// `record` is false for auto-repeat presses, which extend the previous
    /// history entry instead of starting a new one.
    pub fn nudge_selection(&mut self, dx: f32, dy: f32, record: bool) {
        if self.selection.is_empty() {
            return;
        }
        if record || !self.history.can_undo() {
            self.history.push(&self.annotations);
        } else {
            self.history.clear_redo();
        }
        let selection = &self.selection;
        for ann in self.annotations.iter_mut().filter(|a| selection.contains(a.id)) {
            ann.bbox = ann.bbox.translated(dx, dy);
        }
        self.emit_set_changed();
    }

    /// Advance the current drawing category.
    pub fn cycle_category(&mut self, direction: CycleDirection) {
        if let Some(current) = self.palette.cycle(direction).cloned() {
            log::debug!("Cycled current category -> {} ({})", current.id, current.name);
            self.emit_category_changed(&current);
        }
    }

    /// Move the selected annotations to the category next to the primary's.
    pub fn reassign_selected(&mut self, direction: CycleDirection) {
        let Some(primary) = self.selection.primary().and_then(|id| self.annotation(id)) else {
            return;
        };
        let Some(target) = self.palette.neighbour_of(primary.category_id, direction) else {
            log::warn!("No categories available to reassign to");
            return;
        };
        self.set_selected_category(target);
    }

    /// Assign `category_id` to every selected annotation.
    pub fn set_selected_category(&mut self, category_id: i32) {
        let selection = &self.selection;
        let any_differs = self
            .annotations
            .iter()
            .any(|a| selection.contains(a.id) && a.category_id != category_id);
        if !any_differs {
            return;
        }
        self.history.push(&self.annotations);
        let selection = &self.selection;
        for ann in self.annotations.iter_mut().filter(|a| selection.contains(a.id)) {
            ann.category_id = category_id;
        }
        log::debug!(
            "Reassigned {} annotations to category {}",
            self.selection.len(),
            category_id
        );
        self.emit_set_changed();
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Annotations in draw order (bottom first), in screen space.
    pub fn render_items(&self) -> Vec<RenderItem> {
        self.annotations
            .iter()
            .map(|ann| {
                let selected = self.selection.contains(ann.id);
                RenderItem {
                    id: ann.id,
                    rect: self.zoom.rect_to_screen(self.mapper.to_display(ann.bbox)),
                    color: self.palette.color_for(
                        ann.category_id,
                        selected,
                        self.prefs.selection_brighten,
                    ),
                    selected,
                    primary: self.selection.primary() == Some(ann.id),
                }
            })
            .collect()
    }

    /// The provisional box of an in-progress draw, in screen space.
    pub fn draft_rect(&self) -> Option<BoundingBox> {
        match self.gesture {
            GestureState::Drawing { anchor, current } => Some(
                self.zoom
                    .rect_to_screen(BoundingBox::from_corners(anchor, current)),
            ),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    fn emit_set_changed(&mut self) {
        debug_assert!(self.selection.is_consistent());
        for listener in self.listeners.iter_mut() {
            listener.on_annotation_set_changed(&self.annotations);
        }
    }

    fn emit_category_changed(&mut self, category: &Category) {
        for listener in self.listeners.iter_mut() {
            listener.on_current_category_changed(category);
        }
    }
}

impl std::fmt::Debug for AnnotationEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationEditor")
            .field("annotations", &self.annotations.len())
            .field("selection", &self.selection)
            .field("gesture", &self.gesture)
            .field("zoom", &self.zoom)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
