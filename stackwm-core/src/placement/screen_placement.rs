//! Bridge from the live placement-policy config to a concrete
//! strategy, plus the mandatory post-fit and menu placement.
use crate::config::{Config, PlacementPolicy};
use crate::models::{FocusRegistry, Rect, Screen, WindowId, WindowStore};
use crate::placement::{
    clamp_into, decorated_rect, CascadePlacement, CenterPlacement, FocusSmartPlacement,
    MinOverlapPlacement, PlacementCtx, PlacementStrategy, UnderMousePlacement,
};

/// The menu surface the placement bridge can position and show. The
/// concrete widget lives with the display server.
pub trait MenuWindow {
    fn size(&self) -> (i32, i32);
    fn has_title(&self) -> bool;
    /// Bind the menu's movable area to a head rectangle.
    fn set_screen_rect(&mut self, rect: Rect);
    /// Recalculate layout after the screen rectangle changed.
    fn relayout(&mut self);
    fn move_to(&mut self, x: i32, y: i32);
    fn show_and_grab(&mut self);
}

pub struct ScreenPlacement {
    strategy: Option<Box<dyn PlacementStrategy>>,
    /// Policy the current strategy was built for.
    policy: Option<PlacementPolicy>,
}

impl ScreenPlacement {
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategy: None,
            policy: None,
        }
    }

    /// Rebuild the concrete strategy when the configured policy
    /// changed since the last placement. Autotab maps to no strategy:
    /// the caller already resolved placement by attaching to a group.
    fn sync_strategy(&mut self, policy: PlacementPolicy) {
        if self.policy == Some(policy) {
            return;
        }
        self.policy = Some(policy);
        self.strategy = match policy {
            PlacementPolicy::RowSmart => {
                Some(Box::new(FocusSmartPlacement::rows()) as Box<dyn PlacementStrategy>)
            }
            PlacementPolicy::ColSmart => Some(Box::new(FocusSmartPlacement::cols())),
            PlacementPolicy::RowMinOverlap => Some(Box::new(MinOverlapPlacement::rows())),
            PlacementPolicy::ColMinOverlap => Some(Box::new(MinOverlapPlacement::cols())),
            PlacementPolicy::UnderMouse => Some(Box::new(UnderMousePlacement)),
            PlacementPolicy::Center => Some(Box::new(CenterPlacement)),
            PlacementPolicy::Autotab => None,
            PlacementPolicy::Cascade => Some(Box::new(CascadePlacement::new())),
        };
    }

    /// Place a window on its head per the live policy. Returns the new
    /// frame position, or `None` under the Autotab policy.
    pub fn place_window(
        &mut self,
        window: WindowId,
        store: &WindowStore,
        registry: &FocusRegistry,
        screen: &Screen,
        config: &dyn Config,
    ) -> Option<(i32, i32)> {
        let win = store.window(window)?;
        self.sync_strategy(config.placement_policy());
        let strategy = self.strategy.as_mut()?;

        let head = screen.head(win.head);
        let focused = registry
            .focused_window
            .filter(|&f| f != window)
            .and_then(|f| store.window(f));
        let neighbors: Vec<Rect> = store
            .windows()
            .filter(|w| {
                w.id != window
                    && w.screen == screen.id
                    && !w.iconic
                    && (w.workspace == win.workspace || w.stuck)
            })
            .map(decorated_rect)
            .collect();
        let ctx = PlacementCtx {
            pointer: screen.pointer,
            focused,
            neighbors: &neighbors,
            row_dir: config.row_direction(),
            col_dir: config.col_direction(),
        };
        let (x, y) = strategy.place_window(win, &head, &ctx);

        // Post-fit with the normal, untabbed footprint: a window
        // hanging past the right or bottom edge is recentered on that
        // axis instead.
        let fit_w = win.normal.w + 2 * win.border_width + win.tab_offset_x;
        let fit_h = win.normal.h + 2 * win.border_width + win.tab_offset_y;
        let x = if x + fit_w > head.rect.right() {
            head.rect.x + (head.rect.w - fit_w) / 2
        } else {
            x
        };
        let y = if y + fit_h > head.rect.bottom() {
            head.rect.y + (head.rect.h - fit_h) / 2
        } else {
            y
        };
        Some((x, y))
    }

    /// Position a menu around a point on whatever head contains it,
    /// then show it with input grabbed.
    pub fn place_and_show_menu(&self, menu: &mut dyn MenuWindow, screen: &Screen, x: i32, y: i32) {
        let head = screen.head_at(x, y);
        let rect = screen.usable_rect(head);
        menu.set_screen_rect(rect);
        menu.relayout();
        let (w, h) = menu.size();
        let mx = x - w / 2;
        let my = if menu.has_title() { y - h / 2 } else { y };
        let (mx, my) = clamp_into(&rect, mx, my, w, h);
        menu.move_to(mx, my);
        menu.show_and_grab();
    }
}

impl Default for ScreenPlacement {
    fn default() -> Self {
        Self::new()
    }
}
