//! Screen and window rectangles.
#![allow(clippy::module_name_repetitions)]
use serde::{Deserialize, Serialize};
use std::cmp;

/// A rectangle in screen coordinates, x,y from top left.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.x <= x && x < self.right() && self.y <= y && y < self.bottom()
    }

    /// Area shared between two rectangles, zero when they do not touch.
    #[must_use]
    pub fn overlap_area(&self, other: &Self) -> i64 {
        let ox = cmp::min(self.right(), other.right()) - cmp::max(self.x, other.x);
        let oy = cmp::min(self.bottom(), other.bottom()) - cmp::max(self.y, other.y);
        if ox <= 0 || oy <= 0 {
            return 0;
        }
        i64::from(ox) * i64::from(oy)
    }

    /// The smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = cmp::min(self.x, other.x);
        let y = cmp::min(self.y, other.y);
        let r = cmp::max(self.right(), other.right());
        let b = cmp::max(self.bottom(), other.bottom());
        Self::new(x, y, r - x, b - y)
    }
}

/// A monitor region of the virtual screen. The rectangle is the usable
/// placement area, already reduced by any struts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    pub id: usize,
    pub rect: Rect,
}

impl Head {
    #[must_use]
    pub const fn new(id: usize, rect: Rect) -> Self {
        Self { id, rect }
    }
}
