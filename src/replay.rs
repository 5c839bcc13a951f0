//! Scripted event replay.
//!
//! A replay script describes one image, an optional starting annotation set
//! and a list of host events. Running it drives a real [`AnnotationEditor`]
//! exactly as an interactive host would, which makes it useful both for
//! reproducing editing bugs and for batch-converting recorded sessions.
//!
//! ```json
//! {
//!   "image": { "width": 640, "height": 480 },
//!   "display": { "width": 320, "height": 240 },
//!   "events": [
//!     { "type": "set_category", "id": 2 },
//!     { "type": "pointer", "kind": "down", "x": 10, "y": 10 },
//!     { "type": "pointer", "kind": "up", "x": 110, "y": 60 },
//!     { "type": "key", "key": "Z", "modifiers": { "ctrl": true } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clipboard::ClipboardBuffer;
use crate::config::{ConfigError, EditorConfig};
use crate::editor::{AnnotationEditor, EventRecorder};
use crate::format::{FormatError, yolo};
use crate::input::{KeyCode, KeyEvent, Modifiers, PointerEvent, PointerEventKind};
use crate::model::{Annotation, Category, Point};

/// Errors from loading or running a replay script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid initial annotations: {0}")]
    Format(#[from] FormatError),

    #[error("Image size {width}x{height} must be positive")]
    InvalidImage { width: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Pointer {
        kind: PointerEventKind,
        x: f32,
        y: f32,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Wheel {
        delta: f32,
        x: f32,
        y: f32,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Key {
        key: KeyCode,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        repeat: bool,
    },
    SetCategory {
        id: i32,
    },
    Zoom {
        scale: f32,
        x: f32,
        y: f32,
    },
    ResetZoom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub image: Size,
    /// Defaults to the image size (1:1 display)
    #[serde(default)]
    pub display: Option<Size>,
    /// Overrides the configured categories
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    /// Starting annotations as YOLO lines
    #[serde(default)]
    pub initial: String,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub annotations: Vec<Annotation>,
    /// Set-changed notifications observed during the run
    pub set_changes: usize,
    pub image: Size,
}

impl ReplayOutcome {
    pub fn to_yolo(&self) -> String {
        yolo::encode(&self.annotations, self.image.width, self.image.height)
    }
}

/// Run `script` against a fresh editor built from `config`.
pub fn run_script(script: &ReplayScript, config: &EditorConfig) -> Result<ReplayOutcome, ReplayError> {
    let Size { width, height } = script.image;
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(ReplayError::InvalidImage { width, height });
    }

    let mut config = config.clone();
    if let Some(categories) = &script.categories {
        config.categories = categories.clone();
    }

    let initial = if script.initial.trim().is_empty() {
        Vec::new()
    } else {
        yolo::decode(&script.initial, width, height)?
    };

    let mut editor = AnnotationEditor::new(&config, ClipboardBuffer::shared());
    let recorder = EventRecorder::new();
    editor.subscribe(Box::new(recorder.clone()));
    editor.activate_image(width, height, initial);
    let display = script.display.unwrap_or(script.image);
    editor.set_display_size(display.width, display.height);

    log::info!(
        "Replaying {} events on {}x{} image",
        script.events.len(),
        width,
        height
    );
    for event in &script.events {
        apply_event(&mut editor, event);
    }

    Ok(ReplayOutcome {
        annotations: editor.annotations().to_vec(),
        set_changes: recorder.set_changed_count(),
        image: script.image,
    })
}

fn apply_event(editor: &mut AnnotationEditor, event: &ScriptEvent) {
    match *event {
        ScriptEvent::Pointer {
            kind,
            x,
            y,
            modifiers,
        } => editor.handle_pointer(PointerEvent::new(kind, x, y).with_modifiers(modifiers)),
        ScriptEvent::Wheel {
            delta,
            x,
            y,
            modifiers,
        } => editor.handle_wheel(delta, Point::new(x, y), modifiers),
        ScriptEvent::Key {
            key,
            modifiers,
            repeat,
        } => {
            let event = KeyEvent {
                key,
                modifiers,
                repeat,
            };
            if !editor.handle_key(event) {
                log::debug!("Key {:?} not handled", key);
            }
        }
        ScriptEvent::SetCategory { id } => editor.set_current_category(id),
        ScriptEvent::Zoom { scale, x, y } => editor.zoom_to(scale, Point::new(x, y)),
        ScriptEvent::ResetZoom => editor.reset_zoom(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAW_AND_NUDGE: &str = r#"{
        "image": { "width": 400, "height": 200 },
        "display": { "width": 200, "height": 100 },
        "events": [
            { "type": "set_category", "id": 2 },
            { "type": "pointer", "kind": "down", "x": 10, "y": 10 },
            { "type": "pointer", "kind": "move", "x": 60, "y": 40 },
            { "type": "pointer", "kind": "up", "x": 60, "y": 40 },
            { "type": "pointer", "kind": "down", "x": 30, "y": 20 },
            { "type": "pointer", "kind": "up", "x": 30, "y": 20 },
            { "type": "key", "key": "ArrowRight" },
            { "type": "key", "key": "ArrowRight", "repeat": true }
        ]
    }"#;

    #[test]
    fn test_replay_draw_and_nudge() {
        let script = ReplayScript::from_json(DRAW_AND_NUDGE).unwrap();
        let outcome = run_script(&script, &EditorConfig::new()).unwrap();

        assert_eq!(outcome.annotations.len(), 1);
        let ann = &outcome.annotations[0];
        assert_eq!(ann.category_id, 2);
        assert!((ann.bbox.x - 22.0).abs() < 0.001);
        assert!((ann.bbox.width - 100.0).abs() < 0.001);
        assert_eq!(outcome.set_changes, 3);
        assert_eq!(outcome.to_yolo().lines().count(), 1);
    }

    #[test]
    fn test_replay_with_initial_and_undo() {
        let json = r#"{
            "image": { "width": 100, "height": 100 },
            "initial": "0 0.5 0.5 0.2 0.2",
            "events": [
                { "type": "key", "key": "Key1" },
                { "type": "key", "key": "Delete" },
                { "type": "key", "key": "Z", "modifiers": { "ctrl": true } },
                { "type": "wheel", "delta": -1, "x": 50, "y": 50 },
                { "type": "reset_zoom" }
            ]
        }"#;
        let script = ReplayScript::from_json(json).unwrap();
        let outcome = run_script(&script, &EditorConfig::new()).unwrap();

        assert_eq!(outcome.annotations.len(), 1);
        assert_eq!(outcome.set_changes, 2);
    }

    #[test]
    fn test_script_categories_override_config() {
        let json = r##"{
            "image": { "width": 100, "height": 100 },
            "categories": [ { "id": 7, "name": "Sign", "color_hex": "#ffe119" } ],
            "events": [
                { "type": "pointer", "kind": "down", "x": 10, "y": 10 },
                { "type": "pointer", "kind": "up", "x": 30, "y": 30 }
            ]
        }"##;
        let script = ReplayScript::from_json(json).unwrap();
        let outcome = run_script(&script, &EditorConfig::new()).unwrap();
        assert_eq!(outcome.annotations[0].category_id, 7);
    }

    #[test]
    fn test_invalid_scripts() {
        assert!(matches!(
            ReplayScript::from_json("{ \"events\": [] }"),
            Err(ReplayError::Script(_))
        ));

        let script = ReplayScript::from_json(r#"{ "image": { "width": 0, "height": 10 } }"#).unwrap();
        assert!(matches!(
            run_script(&script, &EditorConfig::new()),
            Err(ReplayError::InvalidImage { .. })
        ));

        let script = ReplayScript::from_json(
            r#"{ "image": { "width": 10, "height": 10 }, "initial": "0 0.5" }"#,
        )
        .unwrap();
        assert!(matches!(
            run_script(&script, &EditorConfig::new()),
            Err(ReplayError::Format(_))
        ));
    }
}
