//! Boxmark - interactive bounding-box annotation engine
//!
//! The editing core of an image-labeling tool: draw, select, move, resize,
//! recategorize, copy/paste and undo axis-aligned boxes over an image shown at
//! arbitrary display size and zoom. Rendering, windowing and file I/O belong
//! to the host, which feeds pointer/keyboard events into an
//! [`AnnotationEditor`] and reads back [`editor::RenderItem`]s and change
//! notifications.
//!
//! Multi-image hosts wrap the editor in a [`session::AnnotationSession`].

pub mod batch;
pub mod clipboard;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod editor;
pub mod format;
pub mod hit_test;
pub mod input;
pub mod keybindings;
pub mod mapper;
pub mod model;
pub mod palette;
pub mod replay;
pub mod selection;
pub mod session;
pub mod undo;
pub mod zoom_math;

pub use clipboard::{ClipboardBuffer, SharedClipboard};
pub use config::{ConfigError, EditorConfig};
pub use editor::{AnnotationEditor, EditorListener};
pub use model::{Annotation, AnnotationId, BoundingBox, Category, Point};
pub use session::AnnotationSession;
