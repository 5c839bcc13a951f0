//! Category data model for annotation categories.

use serde::{Deserialize, Serialize};

use crate::color_utils::{color_for_id, parse_hex_color, to_hex_color};

/// An annotation category with a name and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier; `-1` is reserved for "unassigned"
    pub id: i32,
    /// Display name of the category
    pub name: String,
    /// Color as `#rrggbb`
    pub color_hex: String,
}

impl Category {
    /// Create a new category with the given ID, name, and color.
    pub fn new(id: i32, name: &str, color_hex: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            color_hex: color_hex.to_string(),
        }
    }

    /// Create a category with a generated color.
    pub fn with_generated_color(id: i32, name: &str) -> Self {
        Self::new(id, name, &to_hex_color(color_for_id(id)))
    }

    /// RGB color, or `None` if `color_hex` is malformed.
    pub fn rgb(&self) -> Option<[u8; 3]> {
        parse_hex_color(&self.color_hex)
    }
}

/// Categories a fresh configuration starts with.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(0, "Object", "#e6194b"),
        Category::new(1, "Person", "#3cb44b"),
        Category::new(2, "Vehicle", "#4363d8"),
    ]
}
