//! Pointer gesture state machine: draw, drag and resize.
//!
//! Positions held here are in display space (zoom already removed). Gesture
//! state only records where a gesture started; the live annotation set is
//! rewritten from the starting geometry on every move so clamping never drifts.

use super::AnnotationEditor;
use crate::constants::MIN_DRAW_EXTENT;
use crate::hit_test::ResizeHandle;
use crate::input::{Modifiers, PointerEvent, PointerEventKind};
use crate::model::{Annotation, AnnotationId, BoundingBox, Point};
use crate::palette::CycleDirection;

/// Coarse gesture phase, for hosts that change cursors or status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Idle,
    Drawing,
    Dragging,
    Resizing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    Idle,
    /// Rubber-band box from `anchor` to `current`
    Drawing { anchor: Point, current: Point },
    /// Moving every selected annotation together
    Dragging {
        start: Point,
        /// Image-space boxes of the selection at gesture start
        originals: Vec<(AnnotationId, BoundingBox)>,
        moved: bool,
    },
    /// Dragging one handle of one annotation
    Resizing {
        annotation_id: AnnotationId,
        handle: ResizeHandle,
        start: Point,
        original: BoundingBox,
        moved: bool,
    },
}

impl GestureState {
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureState::Idle => GestureKind::Idle,
            GestureState::Drawing { .. } => GestureKind::Drawing,
            GestureState::Dragging { .. } => GestureKind::Dragging,
            GestureState::Resizing { .. } => GestureKind::Resizing,
        }
    }
}

impl AnnotationEditor {
    /// Feed one pointer event from the host.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let position = self.zoom.screen_to_display(event.position);
        log::trace!(
            "Pointer {:?} at ({:.1}, {:.1}) in {:?}",
            event.kind,
            position.x,
            position.y,
            self.gesture.kind()
        );

        match event.kind {
            PointerEventKind::Down => {
                if !matches!(self.gesture, GestureState::Idle) {
                    // A missed release; close the old gesture where it was
                    log::warn!("Pointer down during {:?}, finishing it first", self.gesture.kind());
                    self.finish_gesture(self.last_pointer);
                }
                self.last_pointer = position;
                self.begin_gesture(position, event.modifiers);
            }
            PointerEventKind::Move => {
                self.last_pointer = position;
                self.update_gesture(position);
            }
            PointerEventKind::Up => {
                self.last_pointer = position;
                self.finish_gesture(position);
            }
            PointerEventKind::Leave => {
                if !matches!(self.gesture, GestureState::Idle) {
                    log::debug!("Pointer left during {:?}, ending gesture", self.gesture.kind());
                    self.finish_gesture(self.last_pointer);
                }
            }
        }
    }

    /// Feed one wheel step. `delta > 0` is wheel-down.
    ///
    /// While drawing with nothing selected the wheel cycles the drawing
    /// category; with a selection and a modifier it recategorizes the
    /// selection; otherwise it zooms about the pointer.
    pub fn handle_wheel(&mut self, delta: f32, position: Point, modifiers: Modifiers) {
        let Some(direction) = CycleDirection::from_wheel(delta) else {
            return;
        };

        if matches!(self.gesture, GestureState::Drawing { .. }) && self.selection.is_empty() {
            self.cycle_category(direction);
            return;
        }
        if !self.selection.is_empty() && modifiers.any() {
            self.reassign_selected(direction);
            return;
        }

        let steps = match direction {
            CycleDirection::Previous => 1,
            CycleDirection::Next => -1,
        };
        self.zoom = self.zoom.wheel(
            steps,
            position,
            self.prefs.zoom_wheel_factor,
            self.prefs.zoom_min,
            self.prefs.zoom_max,
        );
        log::debug!(
            "Zoom {:.2}x, translate ({:.1}, {:.1})",
            self.zoom.scale,
            self.zoom.translate_x,
            self.zoom.translate_y
        );
    }

    /// Zoom to an explicit scale about a screen-space anchor.
    pub fn zoom_to(&mut self, scale: f32, anchor: Point) {
        self.zoom = self
            .zoom
            .zoom_at(scale, anchor, self.prefs.zoom_min, self.prefs.zoom_max);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = crate::zoom_math::ZoomTransform::identity();
    }

    fn begin_gesture(&mut self, position: Point, modifiers: Modifiers) {
        let zoom = self.zoom.scale;

        // Handles of already-selected annotations take priority
        let selected_handle = self.annotations.iter().rev().find_map(|ann| {
            if !self.selection.contains(ann.id) {
                return None;
            }
            self.hit_tester
                .handle_at(&self.mapper.to_display(ann.bbox), position, zoom)
                .map(|handle| (ann.id, handle))
        });
        let handle_hit = selected_handle.or_else(|| {
            self.hit_tester
                .topmost_handle(&self.annotations, &self.mapper, position, zoom)
        });

        if let Some((annotation_id, handle)) = handle_hit {
            if !self.selection.contains(annotation_id) {
                self.selection.select_only(annotation_id);
            }
            if let Some(original) = self.annotation(annotation_id).map(|a| a.bbox) {
                log::debug!("Resizing annotation {} via {:?}", annotation_id, handle);
                self.gesture = GestureState::Resizing {
                    annotation_id,
                    handle,
                    start: position,
                    original,
                    moved: false,
                };
                return;
            }
        }

        if let Some(id) = self
            .hit_tester
            .topmost_body(&self.annotations, &self.mapper, position)
        {
            if modifiers.toggles_selection() {
                self.selection.toggle(id);
                if self.selection.is_empty() {
                    log::debug!("Toggled off the last selected annotation");
                    return;
                }
            } else {
                self.selection.select_only(id);
            }
            let selection = &self.selection;
            let originals = self
                .annotations
                .iter()
                .filter(|a| selection.contains(a.id))
                .map(|a| (a.id, a.bbox))
                .collect();
            log::debug!("Dragging {} annotations", self.selection.len());
            self.gesture = GestureState::Dragging {
                start: position,
                originals,
                moved: false,
            };
            return;
        }

        self.selection.clear();
        log::debug!("Drawing from ({:.1}, {:.1})", position.x, position.y);
        self.gesture = GestureState::Drawing {
            anchor: position,
            current: position,
        };
    }

    fn update_gesture(&mut self, position: Point) {
        match &mut self.gesture {
            GestureState::Idle => {}
            GestureState::Drawing { current, .. } => {
                *current = position;
            }
            GestureState::Dragging {
                start,
                originals,
                moved,
            } => {
                if originals.is_empty() {
                    return;
                }
                let (dx, dy) = position.delta_from(*start);
                let (dx, dy) = self.mapper.delta_to_image(dx, dy);
                if !*moved {
                    if dx == 0.0 && dy == 0.0 {
                        return;
                    }
                    *moved = true;
                    self.history.push(&self.annotations);
                }
                for (id, original) in originals.iter() {
                    if let Some(ann) = self.annotations.iter_mut().find(|a| a.id == *id) {
                        ann.bbox = original.translated(dx, dy);
                    }
                }
            }
            GestureState::Resizing {
                annotation_id,
                handle,
                start,
                original,
                moved,
            } => {
                let (dx, dy) = position.delta_from(*start);
                let (dx, dy) = self.mapper.delta_to_image(dx, dy);
                if !*moved {
                    if dx == 0.0 && dy == 0.0 {
                        return;
                    }
                    *moved = true;
                    self.history.push(&self.annotations);
                }
                let resized = handle.apply(original, dx, dy);
                if let Some(ann) = self.annotations.iter_mut().find(|a| a.id == *annotation_id) {
                    ann.bbox = resized;
                }
            }
        }
    }

    fn finish_gesture(&mut self, position: Point) {
        self.update_gesture(position);
        let gesture = std::mem::replace(&mut self.gesture, GestureState::Idle);
        match gesture {
            GestureState::Idle => {}
            GestureState::Drawing { anchor, current } => {
                let display_rect = BoundingBox::from_corners(anchor, current);
                if display_rect.width > MIN_DRAW_EXTENT && display_rect.height > MIN_DRAW_EXTENT {
                    self.history.push(&self.annotations);
                    let id = self.allocate_id();
                    let bbox = self.mapper.to_image(display_rect);
                    let annotation = Annotation::new(id, bbox, self.current_category_id());
                    log::info!(
                        "Created annotation {} ({:.1}, {:.1}, {:.1}x{:.1}) category {}",
                        id,
                        bbox.x,
                        bbox.y,
                        bbox.width,
                        bbox.height,
                        annotation.category_id
                    );
                    self.annotations.push(annotation);
                    self.emit_set_changed();
                } else {
                    log::debug!("Discarded draw smaller than {}px", MIN_DRAW_EXTENT);
                }
            }
            GestureState::Dragging { moved, .. } => {
                if moved {
                    log::info!("Moved {} annotations", self.selection.len());
                    self.emit_set_changed();
                }
            }
            GestureState::Resizing {
                annotation_id,
                moved,
                ..
            } => {
                if moved {
                    log::info!("Resized annotation {}", annotation_id);
                    self.emit_set_changed();
                }
            }
        }
    }

    /// Abort an in-progress draw without creating anything.
    pub(crate) fn cancel_draw(&mut self) -> bool {
        if matches!(self.gesture, GestureState::Drawing { .. }) {
            self.gesture = GestureState::Idle;
            log::debug!("Draw cancelled");
            true
        } else {
            false
        }
    }
}
