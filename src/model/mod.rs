//! Data models for the annotation editor.

mod annotation;
mod category;

pub use annotation::{Annotation, AnnotationId, BoundingBox, Point};
pub use category::{Category, default_categories};
