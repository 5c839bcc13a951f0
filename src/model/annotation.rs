//! Annotation geometry and data structures.

use serde::{Deserialize, Serialize};

/// Unique identifier for an annotation within one editor.
pub type AnnotationId = u32;

/// A 2D point. Which space it lives in (image or display) is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn delta_from(&self, other: Point) -> (f32, f32) {
        (self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the box
    pub width: f32,
    /// Height of the box
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a bounding box from two corner points.
    ///
    /// The result always has non-negative width and height.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        let width = (p1.x - p2.x).abs();
        let height = (p1.y - p2.y).abs();
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge X coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge Y coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the box (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Get the area of the box.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Move the box by a delta, keeping the top-left corner non-negative.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: (self.x + dx).max(0.0),
            y: (self.y + dy).max(0.0),
            ..*self
        }
    }
}

/// A single labeled box on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Identifier used for selection; stable for the life of the editor.
    pub id: AnnotationId,
    /// Free-form label shown by the host.
    pub name: String,
    /// Geometry in unzoomed image pixels.
    pub bbox: BoundingBox,
    /// Category this annotation belongs to.
    pub category_id: i32,
}

impl Annotation {
    /// Create a new annotation with a generated name.
    pub fn new(id: AnnotationId, bbox: BoundingBox, category_id: i32) -> Self {
        Self {
            id,
            name: format!("box-{id}"),
            bbox,
            category_id,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
