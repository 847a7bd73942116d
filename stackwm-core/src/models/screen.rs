//! Per-output screen geometry and workspace bookkeeping.
use crate::models::{Head, Rect};
use serde::{Deserialize, Serialize};

/// One X screen: heads, pointer, workspaces and lifecycle flags.
///
/// Head ids are 1-based; head 0 denotes all heads combined.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Screen {
    pub id: usize,
    pub heads: Vec<Head>,
    pub pointer: (i32, i32),
    pub current_workspace: usize,
    pub workspace_names: Vec<String>,
    pub shutting_down: bool,
    /// Whether a cycling modifier is currently held, i.e. an
    /// interactive alt-tab style gesture is in progress.
    pub cycling_gesture_active: bool,
    /// Whether a menu is currently shown and can take focus.
    pub menu_visible: bool,
}

impl Screen {
    #[must_use]
    pub fn new(id: usize, heads: Vec<Head>, workspace_names: Vec<String>) -> Self {
        Self {
            id,
            heads,
            pointer: (0, 0),
            current_workspace: 0,
            workspace_names,
            shutting_down: false,
            cycling_gesture_active: false,
            menu_visible: false,
        }
    }

    #[must_use]
    pub fn head_count(&self) -> usize {
        self.heads.len()
    }

    #[must_use]
    pub fn workspace_count(&self) -> usize {
        self.workspace_names.len()
    }

    #[must_use]
    pub fn workspace_name(&self, id: usize) -> Option<&str> {
        self.workspace_names.get(id).map(String::as_str)
    }

    /// Usable rectangle of a head; head 0 is the union of all heads.
    #[must_use]
    pub fn usable_rect(&self, head: usize) -> Rect {
        if head == 0 {
            return self
                .heads
                .iter()
                .map(|h| h.rect)
                .reduce(|a, b| a.union(&b))
                .unwrap_or_default();
        }
        self.heads
            .iter()
            .find(|h| h.id == head)
            .map_or_else(|| self.usable_rect(0), |h| h.rect)
    }

    #[must_use]
    pub fn head(&self, head: usize) -> Head {
        Head::new(head, self.usable_rect(head))
    }

    /// The head containing a point, 0 when no head does.
    #[must_use]
    pub fn head_at(&self, x: i32, y: i32) -> usize {
        self.heads
            .iter()
            .find(|h| h.rect.contains_point(x, y))
            .map_or(0, |h| h.id)
    }

    /// The head currently under the pointer.
    #[must_use]
    pub fn pointer_head(&self) -> usize {
        self.head_at(self.pointer.0, self.pointer.1)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(
            0,
            vec![Head::new(1, Rect::new(0, 0, 800, 600))],
            vec!["one".into(), "two".into(), "three".into(), "four".into()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_head_screen() -> Screen {
        Screen::new(
            0,
            vec![
                Head::new(1, Rect::new(0, 0, 800, 600)),
                Head::new(2, Rect::new(800, 0, 1024, 768)),
            ],
            vec!["one".into(), "two".into()],
        )
    }

    #[test]
    fn head_at_finds_the_containing_head() {
        let screen = two_head_screen();
        assert_eq!(screen.head_at(10, 10), 1);
        assert_eq!(screen.head_at(900, 100), 2);
        assert_eq!(screen.head_at(-5, -5), 0);
    }

    #[test]
    fn head_zero_is_the_union_of_all_heads() {
        let screen = two_head_screen();
        assert_eq!(screen.usable_rect(0), Rect::new(0, 0, 1824, 768));
    }
}
