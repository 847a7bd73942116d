//! Placement adjacent to the focused window. Row and column variants
//! share one directional algorithm with the axis roles swapped.
use crate::config::{ColDirection, RowDirection};
use crate::models::{Head, WmWindow};
use crate::placement::{decorated_rect, decorated_size, PlacementCtx, PlacementStrategy};

/// One axis of the head, walked forward or backward.
struct Axis {
    start: i32,
    end: i32,
    forward: bool,
}

impl Axis {
    /// Position extending past the focused interval in the walk
    /// direction, if a frame of `size` still fits the head.
    fn extend(&self, focus_start: i32, focus_end: i32, size: i32) -> Option<i32> {
        if self.forward {
            (focus_end + size <= self.end).then_some(focus_end)
        } else {
            let candidate = focus_start - size;
            (candidate >= self.start).then_some(candidate)
        }
    }

    /// The head edge the walk starts from.
    fn origin(&self, size: i32) -> i32 {
        if self.forward {
            self.start
        } else {
            self.end - size
        }
    }
}

#[derive(Debug)]
pub struct FocusSmartPlacement {
    /// Grow along rows (x primary) or columns (y primary).
    row_primary: bool,
}

impl FocusSmartPlacement {
    #[must_use]
    pub fn rows() -> Self {
        Self { row_primary: true }
    }

    #[must_use]
    pub fn cols() -> Self {
        Self { row_primary: false }
    }
}

impl PlacementStrategy for FocusSmartPlacement {
    fn place_window(&mut self, window: &WmWindow, head: &Head, ctx: &PlacementCtx) -> (i32, i32) {
        let (w, h) = decorated_size(window);
        // First window on the screen: nothing to be adjacent to.
        let Some(focused) = ctx.focused else {
            return (head.rect.x, head.rect.y);
        };
        let focused = decorated_rect(focused);

        let row = Axis {
            start: head.rect.x,
            end: head.rect.right(),
            forward: ctx.row_dir == RowDirection::LeftToRight,
        };
        let col = Axis {
            start: head.rect.y,
            end: head.rect.bottom(),
            forward: ctx.col_dir == ColDirection::TopToBottom,
        };
        let (primary, secondary, p_size, s_size, p_focus, s_focus) = if self.row_primary {
            (row, col, w, h, (focused.x, focused.right()), (focused.y, focused.bottom()))
        } else {
            (col, row, h, w, (focused.y, focused.bottom()), (focused.x, focused.right()))
        };

        let (p, s) = match primary.extend(p_focus.0, p_focus.1, p_size) {
            // Room next to the focused window: align with it in the
            // secondary axis.
            Some(p) => (p, s_focus.0),
            // Out of room: wrap to the primary origin and try to
            // advance one step in the secondary direction instead.
            None => {
                let p = primary.origin(p_size);
                let s = secondary
                    .extend(s_focus.0, s_focus.1, s_size)
                    .unwrap_or_else(|| secondary.origin(s_size));
                (p, s)
            }
        };
        if self.row_primary {
            (p, s)
        } else {
            (s, p)
        }
    }
}
