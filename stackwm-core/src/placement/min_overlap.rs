//! Placement minimizing total overlap with the existing windows.
use crate::config::{ColDirection, RowDirection};
use crate::models::{Head, Rect, WmWindow};
use crate::placement::{clamp_into, decorated_size, PlacementCtx, PlacementStrategy};

#[derive(Debug)]
pub struct MinOverlapPlacement {
    /// Scan candidates row-major or column-major; decides ties.
    row_major: bool,
}

impl MinOverlapPlacement {
    #[must_use]
    pub fn rows() -> Self {
        Self { row_major: true }
    }

    #[must_use]
    pub fn cols() -> Self {
        Self { row_major: false }
    }

    /// Candidate positions: the head origin plus every edge of every
    /// neighbor, clamped into the head.
    fn candidates(head: &Rect, neighbors: &[Rect], w: i32, h: i32) -> Vec<(i32, i32)> {
        let mut xs = vec![head.x, head.right() - w];
        let mut ys = vec![head.y, head.bottom() - h];
        for n in neighbors {
            xs.push(n.right());
            xs.push(n.x - w);
            xs.push(n.x);
            ys.push(n.bottom());
            ys.push(n.y - h);
            ys.push(n.y);
        }
        let mut out = Vec::with_capacity(xs.len() * ys.len());
        for &x in &xs {
            for &y in &ys {
                let pos = clamp_into(head, x, y, w, h);
                if !out.contains(&pos) {
                    out.push(pos);
                }
            }
        }
        out
    }
}

impl PlacementStrategy for MinOverlapPlacement {
    fn place_window(&mut self, window: &WmWindow, head: &Head, ctx: &PlacementCtx) -> (i32, i32) {
        let (w, h) = decorated_size(window);
        let mut best = (head.rect.x, head.rect.y);
        let mut best_score = i64::MAX;
        let mut candidates = Self::candidates(&head.rect, ctx.neighbors, w, h);
        // Direction-aware scan order so ties resolve towards the
        // configured starting corner.
        candidates.sort_by_key(|&(x, y)| {
            let kx = if ctx.row_dir == RowDirection::LeftToRight {
                i64::from(x)
            } else {
                -i64::from(x)
            };
            let ky = if ctx.col_dir == ColDirection::TopToBottom {
                i64::from(y)
            } else {
                -i64::from(y)
            };
            if self.row_major {
                (ky, kx)
            } else {
                (kx, ky)
            }
        });
        for (x, y) in candidates {
            let frame = Rect::new(x, y, w, h);
            let score: i64 = ctx.neighbors.iter().map(|n| frame.overlap_area(n)).sum();
            if score < best_score {
                best_score = score;
                best = (x, y);
                if score == 0 {
                    break;
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WindowId;

    fn ctx<'a>(neighbors: &'a [Rect]) -> PlacementCtx<'a> {
        PlacementCtx {
            pointer: (0, 0),
            focused: None,
            neighbors,
            row_dir: RowDirection::LeftToRight,
            col_dir: ColDirection::TopToBottom,
        }
    }

    fn window(w: i32, h: i32) -> WmWindow {
        let mut win = WmWindow::new(WindowId(0), Rect::new(0, 0, w, h));
        win.border_width = 0;
        win
    }

    #[test]
    fn empty_head_places_at_the_origin() {
        let head = Head::new(1, Rect::new(0, 0, 800, 600));
        let win = window(100, 100);
        let pos = MinOverlapPlacement::rows().place_window(&win, &head, &ctx(&[]));
        assert_eq!(pos, (0, 0));
    }

    #[test]
    fn avoids_an_occupied_corner() {
        let head = Head::new(1, Rect::new(0, 0, 800, 600));
        let neighbors = [Rect::new(0, 0, 400, 600)];
        let win = window(100, 100);
        let pos = MinOverlapPlacement::rows().place_window(&win, &head, &ctx(&neighbors));
        assert_eq!(pos, (400, 0));
        let frame = Rect::new(pos.0, pos.1, 100, 100);
        assert_eq!(frame.overlap_area(&neighbors[0]), 0);
    }

    #[test]
    fn picks_the_least_covered_spot_when_everything_overlaps() {
        let head = Head::new(1, Rect::new(0, 0, 200, 200));
        // Covers all but a 50px strip at the bottom.
        let neighbors = [Rect::new(0, 0, 200, 150)];
        let win = window(200, 100);
        let pos = MinOverlapPlacement::rows().place_window(&win, &head, &ctx(&neighbors));
        let frame = Rect::new(pos.0, pos.1, 200, 100);
        assert_eq!(frame.overlap_area(&neighbors[0]), 200 * 50);
        assert_eq!(pos, (0, 100));
    }

    #[test]
    fn candidate_frames_never_leave_the_head() {
        let head = Head::new(1, Rect::new(0, 0, 300, 300));
        let neighbors = [Rect::new(250, 250, 100, 100)];
        let win = window(120, 120);
        let pos = MinOverlapPlacement::cols().place_window(&win, &head, &ctx(&neighbors));
        assert!(pos.0 >= 0 && pos.0 + 120 <= 300);
        assert!(pos.1 >= 0 && pos.1 + 120 <= 300);
    }
}
