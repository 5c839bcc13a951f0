//! Global constants for the annotation editor

/// Number of snapshots kept on the undo stack
pub const UNDO_HISTORY_SIZE: usize = 20;

/// Offset (image pixels) applied to pasted annotations on both axes
pub const PASTE_OFFSET: f32 = 20.0;

/// Side length of a resize handle at 1x zoom (display pixels)
pub const HANDLE_SIZE: f32 = 8.0;

/// Minimum width/height of a box in image pixels
pub const MIN_BOX_SIZE: f32 = 1.0;

/// A drawn box must exceed this extent (display pixels) on both axes to be kept
pub const MIN_DRAW_EXTENT: f32 = 1.0;

/// Distance (image pixels) an arrow key moves the selection
pub const NUDGE_STEP: f32 = 1.0;

/// Amount added to each RGB channel of a selected annotation's color
pub const SELECTION_BRIGHTEN: u8 = 60;

/// Fallback color for annotations whose category is not in the palette
pub const FALLBACK_COLOR: [u8; 3] = [128, 128, 128];

/// Category id reserved for "unassigned / skip" in mapping contexts
pub const UNASSIGNED_CATEGORY_ID: i32 = -1;

/// Zoom limits and wheel step for the display transform.
pub mod zoom {
    /// Minimum zoom (no zooming out past the fitted view)
    pub const MIN: f32 = 1.0;
    /// Maximum zoom
    pub const MAX: f32 = 5.0;
    /// Multiplicative factor per wheel step
    pub const WHEEL_FACTOR: f32 = 1.25;
    /// Scales within this distance of 1.0 snap back to the identity transform
    pub const IDENTITY_SNAP: f32 = 1e-4;
}
