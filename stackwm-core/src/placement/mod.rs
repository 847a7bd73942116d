//! Initial window placement strategies and the config-driven bridge
//! that selects between them.
mod cascade;
mod center;
mod focus_smart;
mod min_overlap;
mod screen_placement;
mod under_mouse;

pub use cascade::CascadePlacement;
pub use center::CenterPlacement;
pub use focus_smart::FocusSmartPlacement;
pub use min_overlap::MinOverlapPlacement;
pub use screen_placement::{MenuWindow, ScreenPlacement};
pub use under_mouse::UnderMousePlacement;

use crate::config::{ColDirection, RowDirection};
use crate::models::{Head, Rect, WmWindow};

/// Everything a strategy may consult for one placement decision,
/// gathered by the caller.
pub struct PlacementCtx<'a> {
    pub pointer: (i32, i32),
    /// The currently focused window, if any.
    pub focused: Option<&'a WmWindow>,
    /// Decorated rectangles of the other visible, unminimized windows
    /// sharing the head.
    pub neighbors: &'a [Rect],
    pub row_dir: RowDirection,
    pub col_dir: ColDirection,
}

/// A placement strategy yields a position for the window's decorated
/// frame inside the head's usable rectangle.
pub trait PlacementStrategy {
    fn place_window(&mut self, window: &WmWindow, head: &Head, ctx: &PlacementCtx) -> (i32, i32);
}

/// Frame footprint of a window: current size plus both borders.
#[must_use]
pub(crate) fn decorated_size(window: &WmWindow) -> (i32, i32) {
    (
        window.current.w + 2 * window.border_width,
        window.current.h + 2 * window.border_width,
    )
}

/// Decorated rectangle at the window's current position.
#[must_use]
pub(crate) fn decorated_rect(window: &WmWindow) -> Rect {
    let (w, h) = decorated_size(window);
    Rect::new(window.current.x, window.current.y, w, h)
}

/// Clamp a frame of the given size into the head, never wrapping. A
/// frame larger than the head pins to the head's top-left edge.
#[must_use]
pub(crate) fn clamp_into(head: &Rect, x: i32, y: i32, w: i32, h: i32) -> (i32, i32) {
    let x = x.min(head.right() - w).max(head.x);
    let y = y.min(head.bottom() - h).max(head.y);
    (x, y)
}
