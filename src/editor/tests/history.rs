use super::*;
use crate::editor::EditorEvent;

#[test]
fn history_is_bounded() {
    let (mut editor, _) = fresh_editor();

    for i in 0..25 {
        let x = (i % 5) as f32 * 35.0;
        let y = (i / 5) as f32 * 35.0;
        drag(&mut editor, (x + 2.0, y + 2.0), (x + 30.0, y + 30.0));
    }
    assert_eq!(editor.annotations().len(), 25);
    assert_eq!(editor.history().undo_count(), 20);

    for _ in 0..30 {
        editor.undo();
    }
    // The five oldest entries fell off the bottom
    assert_eq!(editor.annotations().len(), 5);
    assert!(!editor.history().can_undo());
}

#[test]
fn undo_then_redo_restores_state() {
    let (mut editor, _) = fresh_editor();
    drag(&mut editor, (10.0, 10.0), (40.0, 40.0));
    drag(&mut editor, (60.0, 60.0), (90.0, 90.0));
    drag(&mut editor, (120.0, 120.0), (150.0, 150.0));
    let after_edits = editor.annotations().to_vec();

    editor.undo();
    editor.undo();
    assert_eq!(editor.annotations().len(), 1);
    assert_eq!(editor.history().redo_count(), 2);

    editor.redo();
    editor.redo();
    assert_eq!(editor.annotations(), after_edits.as_slice());
    assert!(!editor.history().can_redo());
}

#[test]
fn new_edit_clears_redo() {
    let (mut editor, _) = fresh_editor();
    drag(&mut editor, (10.0, 10.0), (40.0, 40.0));
    editor.undo();
    assert!(editor.history().can_redo());

    drag(&mut editor, (60.0, 60.0), (90.0, 90.0));
    assert!(!editor.history().can_redo());
}

#[test]
fn undo_with_empty_history_is_silent() {
    let (mut editor, recorder) = fresh_editor();
    editor.undo();
    editor.redo();
    assert!(recorder.is_empty());
}

#[test]
fn undo_notifies_and_clears_selection() {
    let (mut editor, recorder) = fresh_editor();
    seed(&mut editor, &[(10.0, 10.0, 30.0, 30.0, 0)]);
    drag(&mut editor, (20.0, 20.0), (30.0, 30.0));
    assert!(!editor.selection().is_empty());
    recorder.take();

    editor.undo();

    assert!(editor.selection().is_empty());
    let events = recorder.take();
    assert_eq!(events.len(), 1);
    match &events[0] {
        EditorEvent::AnnotationSetChanged(set) => {
            assert_bbox(set[0].bbox, BoundingBox::new(10.0, 10.0, 30.0, 30.0));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn delete_removes_selected_and_is_undoable() {
    let (mut editor, recorder) = fresh_editor();
    seed(
        &mut editor,
        &[(10.0, 10.0, 30.0, 30.0, 0), (100.0, 100.0, 40.0, 40.0, 1)],
    );
    click(&mut editor, 20.0, 20.0);

    editor.delete_selected();

    assert_eq!(editor.annotations().len(), 1);
    assert_eq!(editor.annotations()[0].id, 2);
    assert!(editor.selection().is_empty());
    assert_eq!(recorder.set_changed_count(), 1);

    editor.undo();
    assert_eq!(editor.annotations().len(), 2);
}

#[test]
fn delete_with_empty_selection_does_nothing() {
    let (mut editor, recorder) = fresh_editor();
    seed(&mut editor, &[(10.0, 10.0, 30.0, 30.0, 0)]);

    editor.delete_selected();

    assert_eq!(editor.annotations().len(), 1);
    assert!(!editor.history().can_undo());
    assert!(recorder.is_empty());
}

#[test]
fn activate_image_resets_history_and_hands_back_set() {
    let (mut editor, _) = fresh_editor();
    drag(&mut editor, (10.0, 10.0), (40.0, 40.0));
    assert!(editor.history().can_undo());

    let outgoing = editor.activate_image(100.0, 100.0, Vec::new());

    assert_eq!(outgoing.len(), 1);
    assert!(editor.annotations().is_empty());
    assert!(!editor.history().can_undo());
    assert!(editor.zoom().is_identity());
}

#[test]
fn activate_image_reissues_duplicate_ids() {
    let (mut editor, _) = fresh_editor();
    let incoming = vec![
        Annotation::new(7, BoundingBox::new(0.0, 0.0, 5.0, 5.0), 0),
        Annotation::new(7, BoundingBox::new(10.0, 0.0, 5.0, 5.0), 0),
        Annotation::new(0, BoundingBox::new(20.0, 0.0, 5.0, 5.0), 0),
    ];

    editor.activate_image(100.0, 100.0, incoming);

    let ids: Vec<u32> = editor.annotations().iter().map(|a| a.id).collect();
    assert_eq!(ids[0], 7);
    assert!(ids[1] > 7 && ids[2] > 7 && ids[1] != ids[2]);

    // New boxes never collide with adopted ones
    drag(&mut editor, (50.0, 50.0), (80.0, 80.0));
    let last = editor.annotations().last().map(|a| a.id);
    assert!(last.is_some_and(|id| !ids.contains(&id)));
}

#[test]
fn refresh_records_history_without_notifying() {
    let (mut editor, recorder) = fresh_editor();
    seed(&mut editor, &[(10.0, 10.0, 30.0, 30.0, 0)]);
    click(&mut editor, 20.0, 20.0);

    editor.refresh_annotations(vec![Annotation::new(
        9,
        BoundingBox::new(50.0, 50.0, 10.0, 10.0),
        2,
    )]);

    assert_eq!(editor.annotations().len(), 1);
    assert!(editor.selection().is_empty());
    assert!(recorder.is_empty());
    editor.undo();
    assert_eq!(editor.annotations()[0].id, 1);
}

#[test]
fn removing_current_category_moves_pointer_and_notifies() {
    let (mut editor, recorder) = fresh_editor();
    editor.set_current_category(3);
    recorder.take();

    editor.set_categories(categories(2));

    assert_eq!(editor.palette().current_id(), Some(0));
    assert_eq!(recorder.category_changed_count(), 1);
}

#[test]
fn keeping_current_category_is_silent() {
    let (mut editor, recorder) = fresh_editor();
    editor.set_current_category(1);
    recorder.take();

    editor.set_categories(categories(3));

    assert_eq!(editor.palette().current_id(), Some(1));
    assert!(recorder.is_empty());
}
