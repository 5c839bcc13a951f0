//! Resize-handle and body hit-testing against displayed geometry.
//!
//! All inputs are in unzoomed display space. Handle zones shrink with zoom as
//! `handle_size * sqrt(zoom) / zoom`, so on screen they grow only by `sqrt(zoom)`.

use crate::constants::MIN_BOX_SIZE;
use crate::mapper::CoordinateMapper;
use crate::model::{Annotation, AnnotationId, BoundingBox, Point};

/// One of the eight resize handles of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    /// Corners first: on tiny boxes they overlap the edge zones and should win.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::Top,
        ResizeHandle::Right,
        ResizeHandle::Bottom,
        ResizeHandle::Left,
    ];

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft
                | ResizeHandle::TopRight
                | ResizeHandle::BottomRight
                | ResizeHandle::BottomLeft
        )
    }

    fn moves_left(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Left | ResizeHandle::BottomLeft
        )
    }

    fn moves_right(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopRight | ResizeHandle::Right | ResizeHandle::BottomRight
        )
    }

    fn moves_top(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Top | ResizeHandle::TopRight
        )
    }

    fn moves_bottom(&self) -> bool {
        matches!(
            self,
            ResizeHandle::BottomLeft | ResizeHandle::Bottom | ResizeHandle::BottomRight
        )
    }

    /// Center of this handle's zone on `rect`.
    pub fn anchor(&self, rect: &BoundingBox) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            ResizeHandle::TopLeft => Point::new(rect.x, rect.y),
            ResizeHandle::Top => Point::new(cx, rect.y),
            ResizeHandle::TopRight => Point::new(rect.right(), rect.y),
            ResizeHandle::Right => Point::new(rect.right(), cy),
            ResizeHandle::BottomRight => Point::new(rect.right(), rect.bottom()),
            ResizeHandle::Bottom => Point::new(cx, rect.bottom()),
            ResizeHandle::BottomLeft => Point::new(rect.x, rect.bottom()),
            ResizeHandle::Left => Point::new(rect.x, cy),
        }
    }

    /// Resize `original` by dragging this handle `(dx, dy)` image pixels.
    ///
    /// The opposite edge stays put; width and height never drop below
    /// [`MIN_BOX_SIZE`], and the box never crosses the image origin.
    pub fn apply(&self, original: &BoundingBox, dx: f32, dy: f32) -> BoundingBox {
        let mut left = original.x;
        let mut top = original.y;
        let mut right = original.right();
        let mut bottom = original.bottom();

        if self.moves_left() {
            left = (left + dx).max(0.0).min(right - MIN_BOX_SIZE);
        }
        if self.moves_right() {
            right = (right + dx).max(left + MIN_BOX_SIZE);
        }
        if self.moves_top() {
            top = (top + dy).max(0.0).min(bottom - MIN_BOX_SIZE);
        }
        if self.moves_bottom() {
            bottom = (bottom + dy).max(top + MIN_BOX_SIZE);
        }

        BoundingBox::new(
            left,
            top,
            (right - left).max(MIN_BOX_SIZE),
            (bottom - top).max(MIN_BOX_SIZE),
        )
    }
}

/// Handle size compensated for zoom.
pub fn handle_zone_size(handle_size: f32, zoom: f32) -> f32 {
    let zoom = zoom.max(f32::EPSILON);
    handle_size * zoom.sqrt() / zoom
}

/// Hit-tester for one display configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTester {
    pub handle_size: f32,
}

impl HitTester {
    pub fn new(handle_size: f32) -> Self {
        Self { handle_size }
    }

    /// Handle of a display-space rect under `point`, if any.
    pub fn handle_at(&self, rect: &BoundingBox, point: Point, zoom: f32) -> Option<ResizeHandle> {
        let half = handle_zone_size(self.handle_size, zoom) / 2.0;
        ResizeHandle::ALL.into_iter().find(|handle| {
            let anchor = handle.anchor(rect);
            (point.x - anchor.x).abs() <= half && (point.y - anchor.y).abs() <= half
        })
    }

    /// Topmost annotation whose handle is under `point`.
    pub fn topmost_handle(
        &self,
        annotations: &[Annotation],
        mapper: &CoordinateMapper,
        point: Point,
        zoom: f32,
    ) -> Option<(AnnotationId, ResizeHandle)> {
        annotations.iter().rev().find_map(|ann| {
            self.handle_at(&mapper.to_display(ann.bbox), point, zoom)
                .map(|handle| (ann.id, handle))
        })
    }

    /// Topmost annotation whose body contains `point`.
    pub fn topmost_body(
        &self,
        annotations: &[Annotation],
        mapper: &CoordinateMapper,
        point: Point,
    ) -> Option<AnnotationId> {
        annotations
            .iter()
            .rev()
            .find(|ann| mapper.to_display(ann.bbox).contains(point))
            .map(|ann| ann.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_mapper() -> CoordinateMapper {
        CoordinateMapper::new(100.0, 100.0, 100.0, 100.0)
    }

    #[test]
    fn test_handle_zone_shrinks_with_zoom() {
        assert_eq!(handle_zone_size(8.0, 1.0), 8.0);
        assert!((handle_zone_size(8.0, 4.0) - 4.0).abs() < 1e-5);
        // On screen the zone is still larger than at 1x
        assert!(handle_zone_size(8.0, 5.0) * 5.0 > 8.0);
    }

    #[test]
    fn test_handle_at_corners_and_edges() {
        let tester = HitTester::new(8.0);
        let rect = BoundingBox::new(10.0, 10.0, 100.0, 50.0);

        assert_eq!(
            tester.handle_at(&rect, Point::new(11.0, 9.0), 1.0),
            Some(ResizeHandle::TopLeft)
        );
        assert_eq!(
            tester.handle_at(&rect, Point::new(60.0, 60.0), 1.0),
            Some(ResizeHandle::Bottom)
        );
        assert_eq!(
            tester.handle_at(&rect, Point::new(110.0, 35.0), 1.0),
            Some(ResizeHandle::Right)
        );
        assert_eq!(tester.handle_at(&rect, Point::new(50.0, 30.0), 1.0), None);
    }

    #[test]
    fn test_corner_wins_on_tiny_box() {
        let tester = HitTester::new(8.0);
        let rect = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        let handle = tester.handle_at(&rect, Point::new(0.5, 0.5), 1.0);
        assert_eq!(handle, Some(ResizeHandle::TopLeft));
    }

    #[test]
    fn test_topmost_body_prefers_last_inserted() {
        let tester = HitTester::new(8.0);
        let annotations = vec![
            Annotation::new(1, BoundingBox::new(0.0, 0.0, 50.0, 50.0), 0),
            Annotation::new(2, BoundingBox::new(20.0, 20.0, 50.0, 50.0), 0),
        ];
        let mapper = identity_mapper();
        assert_eq!(tester.topmost_body(&annotations, &mapper, Point::new(30.0, 30.0)), Some(2));
        assert_eq!(tester.topmost_body(&annotations, &mapper, Point::new(5.0, 5.0)), Some(1));
        assert_eq!(tester.topmost_body(&annotations, &mapper, Point::new(90.0, 5.0)), None);
    }

    #[test]
    fn test_topmost_handle_uses_display_geometry() {
        let tester = HitTester::new(8.0);
        let annotations = vec![Annotation::new(4, BoundingBox::new(10.0, 10.0, 20.0, 20.0), 0)];
        // Image is half the display size, so the box is drawn at (20,20)-(60,60)
        let mapper = CoordinateMapper::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(
            tester.topmost_handle(&annotations, &mapper, Point::new(60.0, 60.0), 1.0),
            Some((4, ResizeHandle::BottomRight))
        );
    }

    #[test]
    fn test_apply_corner_moves_two_edges() {
        let original = BoundingBox::new(10.0, 10.0, 100.0, 50.0);
        let resized = ResizeHandle::TopLeft.apply(&original, 5.0, -5.0);
        assert_eq!(resized, BoundingBox::new(15.0, 5.0, 95.0, 55.0));
    }

    #[test]
    fn test_apply_edge_moves_one_edge() {
        let original = BoundingBox::new(10.0, 10.0, 100.0, 50.0);
        let resized = ResizeHandle::Right.apply(&original, 20.0, 30.0);
        assert_eq!(resized, BoundingBox::new(10.0, 10.0, 120.0, 50.0));
    }

    #[test]
    fn test_apply_clamps_minimum_size() {
        let original = BoundingBox::new(10.0, 10.0, 100.0, 50.0);
        let resized = ResizeHandle::Left.apply(&original, 500.0, 0.0);
        assert_eq!(resized.width, MIN_BOX_SIZE);
        assert_eq!(resized.right(), original.right());

        let resized = ResizeHandle::Bottom.apply(&original, 0.0, -500.0);
        assert_eq!(resized.height, MIN_BOX_SIZE);
        assert_eq!(resized.y, original.y);
    }
}
