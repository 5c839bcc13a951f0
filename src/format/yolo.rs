//! YOLO TXT interchange.
//!
//! One line per bounding box: `categoryId centerX centerY width height`, all
//! coordinates normalized by the image dimensions. Blank lines and lines
//! starting with `#` are ignored on decode. Extra trailing columns (such as a
//! detector confidence score) are ignored too.

use super::FormatError;
use crate::constants::UNASSIGNED_CATEGORY_ID;
use crate::model::{Annotation, AnnotationId, BoundingBox};

/// Encode annotations as YOLO lines.
///
/// Annotations with a negative category (unassigned) have no YOLO class and
/// are skipped. Boxes are clipped to the image first, and boxes left with no
/// area are skipped. Returns an empty string for degenerate image dimensions.
pub fn encode(annotations: &[Annotation], image_width: f32, image_height: f32) -> String {
    if !valid_dimensions(image_width, image_height) {
        log::warn!(
            "Cannot encode YOLO for {}x{} image; dimensions must be positive",
            image_width,
            image_height
        );
        return String::new();
    }

    let mut skipped = 0;
    let lines: Vec<String> = annotations
        .iter()
        .filter_map(|ann| {
            if ann.category_id < 0 {
                if ann.category_id != UNASSIGNED_CATEGORY_ID {
                    log::warn!("Annotation {} has category {}", ann.id, ann.category_id);
                }
                skipped += 1;
                return None;
            }
            let b = &ann.bbox;
            let left = b.x.clamp(0.0, image_width);
            let top = b.y.clamp(0.0, image_height);
            let right = b.right().clamp(0.0, image_width);
            let bottom = b.bottom().clamp(0.0, image_height);
            if right <= left || bottom <= top {
                log::debug!("Annotation {} lies outside the image", ann.id);
                skipped += 1;
                return None;
            }
            let cx = (left + right) / 2.0 / image_width;
            let cy = (top + bottom) / 2.0 / image_height;
            let nw = (right - left) / image_width;
            let nh = (bottom - top) / image_height;
            Some(format!(
                "{} {:.6} {:.6} {:.6} {:.6}",
                ann.category_id, cx, cy, nw, nh
            ))
        })
        .collect();

    if skipped > 0 {
        log::debug!("Skipped {} annotations on export", skipped);
    }
    lines.join("\n")
}

/// Decode YOLO lines into pixel-space annotations.
///
/// Ids are assigned sequentially from 1 in line order. Boxes that extend past
/// the image border are clipped to it.
pub fn decode(
    text: &str,
    image_width: f32,
    image_height: f32,
) -> Result<Vec<Annotation>, FormatError> {
    if !valid_dimensions(image_width, image_height) {
        return Err(FormatError::InvalidDimensions {
            width: image_width,
            height: image_height,
        });
    }

    let mut annotations = Vec::new();
    let mut next_id: AnnotationId = 1;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (category_id, [cx, cy, w, h]) = parse_line(line, line_no)?;

        let left = ((cx - w / 2.0) * image_width).max(0.0);
        let top = ((cy - h / 2.0) * image_height).max(0.0);
        let right = ((cx + w / 2.0) * image_width).min(image_width);
        let bottom = ((cy + h / 2.0) * image_height).min(image_height);
        if right <= left || bottom <= top {
            return Err(FormatError::invalid_coordinates(
                line_no,
                "box lies outside the image",
            ));
        }

        let bbox = BoundingBox::new(left, top, right - left, bottom - top);
        annotations.push(Annotation::new(next_id, bbox, category_id));
        next_id += 1;
    }

    log::debug!("Decoded {} YOLO annotations", annotations.len());
    Ok(annotations)
}

fn valid_dimensions(width: f32, height: f32) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

/// Parse one non-blank line into a category and normalized `[cx, cy, w, h]`.
fn parse_line(line: &str, line_no: usize) -> Result<(i32, [f32; 4]), FormatError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return Err(FormatError::invalid_line(
            line_no,
            format!("expected 5 fields, found {}", parts.len()),
        ));
    }

    let category_id: i32 = parts[0].parse().map_err(|_| {
        FormatError::invalid_line(line_no, format!("invalid category id '{}'", parts[0]))
    })?;
    if category_id < 0 {
        return Err(FormatError::invalid_line(
            line_no,
            format!("negative category id {}", category_id),
        ));
    }

    let mut values = [0.0f32; 4];
    for (slot, text) in values.iter_mut().zip(&parts[1..5]) {
        let value: f32 = text.parse().map_err(|_| {
            FormatError::invalid_line(line_no, format!("invalid number '{}'", text))
        })?;
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(FormatError::invalid_coordinates(
                line_no,
                format!("{} is outside [0, 1]", text),
            ));
        }
        *slot = value;
    }

    if values[2] <= 0.0 || values[3] <= 0.0 {
        return Err(FormatError::invalid_coordinates(
            line_no,
            "width and height must be positive",
        ));
    }

    Ok((category_id, values))
}
