//! Ordered category list with a "current" pointer and cycling.

use crate::color_utils::brighten;
use crate::constants::FALLBACK_COLOR;
use crate::model::Category;

/// Direction for cycling through the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

impl CycleDirection {
    /// Wheel down (positive delta) moves forward.
    pub fn from_wheel(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(CycleDirection::Next)
        } else if delta < 0.0 {
            Some(CycleDirection::Previous)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassPalette {
    categories: Vec<Category>,
    current: Option<i32>,
}

impl ClassPalette {
    pub fn new(categories: Vec<Category>) -> Self {
        let current = categories.first().map(|c| c.id);
        Self {
            categories,
            current,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: i32) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.get(id).is_some()
    }

    pub fn current_id(&self) -> Option<i32> {
        self.current
    }

    pub fn current(&self) -> Option<&Category> {
        self.current.and_then(|id| self.get(id))
    }

    /// Replace the category list.
    ///
    /// Returns the new current category if the previous one disappeared and
    /// the pointer had to move to the first entry.
    pub fn set_available(&mut self, categories: Vec<Category>) -> Option<&Category> {
        self.categories = categories;
        let still_present = self.current.is_some_and(|id| self.contains(id));
        if still_present {
            return None;
        }

        let previous = self.current;
        self.current = self.categories.first().map(|c| c.id);
        log::debug!(
            "Palette: current category {:?} not available, now {:?}",
            previous,
            self.current
        );
        if self.current != previous {
            self.current()
        } else {
            None
        }
    }

    /// Set the current category explicitly. Returns it if it changed.
    pub fn select_current(&mut self, id: i32) -> Option<&Category> {
        if self.current == Some(id) {
            return None;
        }
        if !self.contains(id) {
            log::warn!("Palette: ignoring unknown category {}", id);
            return None;
        }
        self.current = Some(id);
        self.current()
    }

    /// Id next to `id` in cycle order, wrapping at both ends.
    ///
    /// An id not in the palette starts from the front (or back, going backwards).
    pub fn neighbour_of(&self, id: i32, direction: CycleDirection) -> Option<i32> {
        let len = self.categories.len();
        if len == 0 {
            return None;
        }
        let next_index = match self.categories.iter().position(|c| c.id == id) {
            Some(index) => match direction {
                CycleDirection::Next => (index + 1) % len,
                CycleDirection::Previous => (index + len - 1) % len,
            },
            None => match direction {
                CycleDirection::Next => 0,
                CycleDirection::Previous => len - 1,
            },
        };
        Some(self.categories[next_index].id)
    }

    /// Advance the current drawing category. Returns it if it changed.
    pub fn cycle(&mut self, direction: CycleDirection) -> Option<&Category> {
        let from = self.current.unwrap_or(crate::constants::UNASSIGNED_CATEGORY_ID);
        let next = self.neighbour_of(from, direction)?;
        if Some(next) == self.current {
            return None;
        }
        self.current = Some(next);
        self.current()
    }

    /// Render color for an annotation of category `id`.
    pub fn color_for(&self, id: i32, selected: bool, brighten_amount: u8) -> [u8; 3] {
        let base = self
            .get(id)
            .and_then(Category::rgb)
            .unwrap_or(FALLBACK_COLOR);
        if selected {
            brighten(base, brighten_amount)
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Vec<Category> {
        vec![
            Category::new(0, "a", "#100000"),
            Category::new(5, "b", "#001000"),
            Category::new(9, "c", "#000010"),
        ]
    }

    #[test]
    fn test_new_starts_at_first() {
        let palette = ClassPalette::new(three());
        assert_eq!(palette.current_id(), Some(0));
    }

    #[test]
    fn test_cycle_wraps_both_directions() {
        let mut palette = ClassPalette::new(three());
        assert_eq!(palette.cycle(CycleDirection::Previous).map(|c| c.id), Some(9));
        assert_eq!(palette.cycle(CycleDirection::Next).map(|c| c.id), Some(0));
        palette.cycle(CycleDirection::Next);
        palette.cycle(CycleDirection::Next);
        assert_eq!(palette.cycle(CycleDirection::Next).map(|c| c.id), Some(0));
    }

    #[test]
    fn test_single_category_cycle_is_noop() {
        let mut palette = ClassPalette::new(vec![Category::new(3, "only", "#ffffff")]);
        assert!(palette.cycle(CycleDirection::Next).is_none());
        assert_eq!(palette.current_id(), Some(3));
    }

    #[test]
    fn test_set_available_keeps_present_current() {
        let mut palette = ClassPalette::new(three());
        palette.select_current(5);
        assert!(palette.set_available(vec![Category::new(5, "b", "#001000")]).is_none());
        assert_eq!(palette.current_id(), Some(5));
    }

    #[test]
    fn test_set_available_resets_missing_current() {
        let mut palette = ClassPalette::new(three());
        palette.select_current(9);
        let changed = palette.set_available(vec![
            Category::new(1, "x", "#ffffff"),
            Category::new(2, "y", "#000000"),
        ]);
        assert_eq!(changed.map(|c| c.id), Some(1));
        assert_eq!(palette.current_id(), Some(1));
    }

    #[test]
    fn test_select_unknown_is_ignored() {
        let mut palette = ClassPalette::new(three());
        assert!(palette.select_current(42).is_none());
        assert_eq!(palette.current_id(), Some(0));
    }

    #[test]
    fn test_color_for_selected_and_orphans() {
        let palette = ClassPalette::new(three());
        assert_eq!(palette.color_for(0, false, 60), [16, 0, 0]);
        assert_eq!(palette.color_for(0, true, 60), [76, 60, 60]);
        assert_eq!(palette.color_for(77, false, 60), FALLBACK_COLOR);
    }
}
