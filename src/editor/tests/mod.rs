//! Behavioural tests for the annotation editor.

mod history;

use super::{AnnotationEditor, EventRecorder};
use crate::clipboard::{ClipboardBuffer, SharedClipboard};
use crate::config::EditorConfig;
use crate::input::{Modifiers, PointerEvent, PointerEventKind};
use crate::model::{Annotation, BoundingBox, Category, Point};

const EPSILON: f32 = 0.001;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn assert_bbox(actual: BoundingBox, expected: BoundingBox) {
    assert!(
        approx_eq(actual.x, expected.x)
            && approx_eq(actual.y, expected.y)
            && approx_eq(actual.width, expected.width)
            && approx_eq(actual.height, expected.height),
        "expected {expected:?}, got {actual:?}"
    );
}

fn categories(n: i32) -> Vec<Category> {
    (0..n)
        .map(|id| Category::with_generated_color(id, &format!("class-{id}")))
        .collect()
}

fn config_with(n_categories: i32) -> EditorConfig {
    let mut config = EditorConfig::new();
    config.categories = categories(n_categories);
    config
}

/// Editor on a `size`x`size` image shown 1:1, with a recorder subscribed.
fn editor_1to1(size: f32, clipboard: SharedClipboard) -> (AnnotationEditor, EventRecorder) {
    let mut editor = AnnotationEditor::new(&config_with(5), clipboard);
    editor.activate_image(size, size, Vec::new());
    editor.set_display_size(size, size);
    let recorder = EventRecorder::new();
    editor.subscribe(Box::new(recorder.clone()));
    (editor, recorder)
}

fn fresh_editor() -> (AnnotationEditor, EventRecorder) {
    editor_1to1(200.0, ClipboardBuffer::shared())
}

fn pointer(editor: &mut AnnotationEditor, kind: PointerEventKind, x: f32, y: f32) {
    editor.handle_pointer(PointerEvent::new(kind, x, y));
}

fn pointer_with(
    editor: &mut AnnotationEditor,
    kind: PointerEventKind,
    x: f32,
    y: f32,
    modifiers: Modifiers,
) {
    editor.handle_pointer(PointerEvent::new(kind, x, y).with_modifiers(modifiers));
}

/// Full press-move-release gesture in screen coordinates.
fn drag(editor: &mut AnnotationEditor, from: (f32, f32), to: (f32, f32)) {
    pointer(editor, PointerEventKind::Down, from.0, from.1);
    pointer(editor, PointerEventKind::Move, to.0, to.1);
    pointer(editor, PointerEventKind::Up, to.0, to.1);
}

fn click(editor: &mut AnnotationEditor, x: f32, y: f32) {
    pointer(editor, PointerEventKind::Down, x, y);
    pointer(editor, PointerEventKind::Up, x, y);
}

fn seed(editor: &mut AnnotationEditor, boxes: &[(f32, f32, f32, f32, i32)]) {
    let annotations: Vec<Annotation> = boxes
        .iter()
        .enumerate()
        .map(|(i, &(x, y, w, h, cat))| {
            Annotation::new(i as u32 + 1, BoundingBox::new(x, y, w, h), cat)
        })
        .collect();
    let (w, h) = editor.mapper().image_size();
    editor.activate_image(w, h, annotations);
}

fn origin() -> Point {
    Point::new(0.0, 0.0)
}
