//! Stateless head-center placement.
use crate::models::{Head, WmWindow};
use crate::placement::{decorated_size, PlacementCtx, PlacementStrategy};

#[derive(Debug, Default)]
pub struct CenterPlacement;

impl PlacementStrategy for CenterPlacement {
    fn place_window(&mut self, window: &WmWindow, head: &Head, _ctx: &PlacementCtx) -> (i32, i32) {
        let (w, h) = decorated_size(window);
        (
            head.rect.x + (head.rect.w - w) / 2,
            head.rect.y + (head.rect.h - h) / 2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColDirection, RowDirection};
    use crate::models::{Rect, WindowId};

    #[test]
    fn window_center_coincides_with_head_center() {
        let head = Head::new(1, Rect::new(0, 0, 1000, 800));
        let mut win = WmWindow::new(WindowId(0), Rect::new(0, 0, 100, 50));
        win.border_width = 0;
        let ctx = PlacementCtx {
            pointer: (0, 0),
            focused: None,
            neighbors: &[],
            row_dir: RowDirection::LeftToRight,
            col_dir: ColDirection::TopToBottom,
        };
        assert_eq!(
            CenterPlacement.place_window(&win, &head, &ctx),
            (450, 375)
        );
    }
}
