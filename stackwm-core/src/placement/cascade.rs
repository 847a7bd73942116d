//! Diagonal cascade placement with one running position per head.
use crate::models::{Head, WmWindow};
use crate::placement::{decorated_size, PlacementCtx, PlacementStrategy};
use std::collections::HashMap;

/// Step floor used when a window carries no usable decoration height.
const MIN_STEP: i32 = 32;

#[derive(Debug, Default)]
pub struct CascadePlacement {
    /// Running next position per head, absent until first use.
    next: HashMap<usize, (i32, i32)>,
}

impl CascadePlacement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlacementStrategy for CascadePlacement {
    fn place_window(&mut self, window: &WmWindow, head: &Head, _ctx: &PlacementCtx) -> (i32, i32) {
        let (w, h) = decorated_size(window);
        let pos = self.next.entry(head.id).or_insert((head.rect.x, head.rect.y));
        // Wrap to the head's top-left once the running position would
        // push the window past the right or bottom edge.
        if pos.0 + w > head.rect.right() || pos.1 + h > head.rect.bottom() {
            *pos = (head.rect.x, head.rect.y);
        }
        let placed = *pos;
        let mut step = window.titlebar_height + window.border_width;
        if step <= 0 {
            step = MIN_STEP;
        }
        pos.0 += step;
        pos.1 += step;
        placed
    }
}
