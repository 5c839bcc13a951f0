//! Image-space ↔ display-space coordinate mapping.
//!
//! Stored annotations are always in unzoomed image pixels. The display space is
//! the fitted, unzoomed presentation of the image; zoom is layered on top of it
//! separately by [`crate::zoom_math::ZoomTransform`].

use crate::model::{BoundingBox, Point};

/// Maps rectangles between image pixels and the fitted display area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    image_width: f32,
    image_height: f32,
    display_width: f32,
    display_height: f32,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl CoordinateMapper {
    pub fn new(image_width: f32, image_height: f32, display_width: f32, display_height: f32) -> Self {
        Self {
            image_width,
            image_height,
            display_width,
            display_height,
        }
    }

    /// Update the true pixel size of the active image.
    pub fn set_image_size(&mut self, width: f32, height: f32) {
        self.image_width = width;
        self.image_height = height;
    }

    /// Update the size of the area the image is presented in.
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        self.display_width = width;
        self.display_height = height;
    }

    pub fn image_size(&self) -> (f32, f32) {
        (self.image_width, self.image_height)
    }

    pub fn display_size(&self) -> (f32, f32) {
        (self.display_width, self.display_height)
    }

    /// Display pixels per image pixel on each axis.
    ///
    /// Any zero-sized dimension yields 1.0 so mapping degrades to identity.
    fn scale(&self) -> (f32, f32) {
        fn axis(display: f32, image: f32) -> f32 {
            if display > 0.0 && image > 0.0 {
                display / image
            } else {
                1.0
            }
        }
        (
            axis(self.display_width, self.image_width),
            axis(self.display_height, self.image_height),
        )
    }

    pub fn to_display(&self, rect: BoundingBox) -> BoundingBox {
        let (sx, sy) = self.scale();
        BoundingBox::new(rect.x * sx, rect.y * sy, rect.width * sx, rect.height * sy)
    }

    pub fn to_image(&self, rect: BoundingBox) -> BoundingBox {
        let (sx, sy) = self.scale();
        BoundingBox::new(rect.x / sx, rect.y / sy, rect.width / sx, rect.height / sy)
    }

    pub fn point_to_image(&self, point: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(point.x / sx, point.y / sy)
    }

    pub fn point_to_display(&self, point: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(point.x * sx, point.y * sy)
    }

    /// Convert a display-space movement into image pixels.
    pub fn delta_to_image(&self, dx: f32, dy: f32) -> (f32, f32) {
        let (sx, sy) = self.scale();
        (dx / sx, dy / sy)
    }
}
