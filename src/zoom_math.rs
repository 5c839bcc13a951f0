//! Zoom-to-cursor mathematics.
//!
//! The zoom transform maps unzoomed display coordinates to screen coordinates:
//! `screen = display * scale + translation`. It only affects rendering and
//! pointer input; stored annotation coordinates never see it.

use crate::constants::zoom as zoom_const;
use crate::model::{BoundingBox, Point};

/// Scale + translation layered over the display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl ZoomTransform {
    pub fn new(scale: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Create an identity transform (scale=1, no translation).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Zoom to `new_scale`, keeping the display point under `anchor` fixed.
    ///
    /// `new_scale` is clamped to `[min, max]`. Landing on 1.0 resets to the
    /// exact identity so no residual translation accumulates.
    pub fn zoom_at(&self, new_scale: f32, anchor: Point, min: f32, max: f32) -> ZoomTransform {
        let new_scale = new_scale.clamp(min, max);
        if (new_scale - 1.0).abs() <= zoom_const::IDENTITY_SNAP {
            return Self::identity();
        }

        // Display-space point under the anchor before zooming
        let content = self.screen_to_display(anchor);

        ZoomTransform {
            scale: new_scale,
            translate_x: anchor.x - content.x * new_scale,
            translate_y: anchor.y - content.y * new_scale,
        }
    }

    /// Apply `steps` wheel notches about `anchor` (positive zooms in).
    pub fn wheel(&self, steps: i32, anchor: Point, factor: f32, min: f32, max: f32) -> ZoomTransform {
        let target = self.scale * factor.powi(steps);
        self.zoom_at(target, anchor, min, max)
    }

    /// Remove the zoom from a screen-space pointer position.
    pub fn screen_to_display(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.translate_x) / self.scale,
            (point.y - self.translate_y) / self.scale,
        )
    }

    pub fn display_to_screen(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.translate_x,
            point.y * self.scale + self.translate_y,
        )
    }

    /// Rectangle as it appears on screen, for the render path.
    pub fn rect_to_screen(&self, rect: BoundingBox) -> BoundingBox {
        let origin = self.display_to_screen(Point::new(rect.x, rect.y));
        BoundingBox::new(origin.x, origin.y, rect.width * self.scale, rect.height * self.scale)
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}
