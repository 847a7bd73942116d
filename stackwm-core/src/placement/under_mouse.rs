//! Placement centered on the pointer, clamped into the head.
use crate::models::{Head, WmWindow};
use crate::placement::{clamp_into, decorated_size, PlacementCtx, PlacementStrategy};

#[derive(Debug, Default)]
pub struct UnderMousePlacement;

impl PlacementStrategy for UnderMousePlacement {
    fn place_window(&mut self, window: &WmWindow, head: &Head, ctx: &PlacementCtx) -> (i32, i32) {
        let (w, h) = decorated_size(window);
        let (px, py) = ctx.pointer;
        clamp_into(&head.rect, px - w / 2, py - h / 2, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColDirection, RowDirection};
    use crate::models::{Rect, WindowId};

    fn ctx<'a>(pointer: (i32, i32)) -> PlacementCtx<'a> {
        PlacementCtx {
            pointer,
            focused: None,
            neighbors: &[],
            row_dir: RowDirection::LeftToRight,
            col_dir: ColDirection::TopToBottom,
        }
    }

    #[test]
    fn centers_on_the_pointer() {
        let head = Head::new(1, Rect::new(0, 0, 800, 600));
        let mut win = WmWindow::new(WindowId(0), Rect::new(0, 0, 200, 100));
        win.border_width = 0;
        assert_eq!(
            UnderMousePlacement.place_window(&win, &head, &ctx((400, 300))),
            (300, 250)
        );
    }

    #[test]
    fn clamps_instead_of_wrapping_at_the_edges() {
        let head = Head::new(1, Rect::new(0, 0, 800, 600));
        let mut win = WmWindow::new(WindowId(0), Rect::new(0, 0, 200, 100));
        win.border_width = 0;
        assert_eq!(
            UnderMousePlacement.place_window(&win, &head, &ctx((10, 5))),
            (0, 0)
        );
        assert_eq!(
            UnderMousePlacement.place_window(&win, &head, &ctx((795, 598))),
            (600, 500)
        );
    }
}
