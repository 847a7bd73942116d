//! Live configuration consumed by the focus and placement engines.
//!
//! Values are externally mutable (menu and config UI write them), so
//! every decision re-reads them through the trait instead of caching.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusModel {
    #[default]
    ClickFocus,
    MouseFocus,
    StrictMouseFocus,
}

impl FocusModel {
    /// True for the focus-follows-mouse models.
    #[must_use]
    pub fn follows_mouse(self) -> bool {
        self != FocusModel::ClickFocus
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabFocusModel {
    #[default]
    ClickToTabFocus,
    MouseTabFocus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColDirection {
    #[default]
    TopToBottom,
    BottomToTop,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementPolicy {
    #[default]
    Cascade,
    RowSmart,
    ColSmart,
    RowMinOverlap,
    ColMinOverlap,
    UnderMouse,
    Center,
    /// Placement was already resolved by attaching to a tab group;
    /// the bridge falls through without moving the window.
    Autotab,
}

pub trait Config {
    fn focus_model(&self) -> FocusModel;

    fn tab_focus_model(&self) -> TabFocusModel;

    /// Whether newly created windows take focus.
    fn focus_new_windows(&self) -> bool;

    /// Whether focus reverts prefer windows on the focused window's head.
    fn focus_same_head(&self) -> bool;

    fn row_direction(&self) -> RowDirection;

    fn col_direction(&self) -> ColDirection;

    fn placement_policy(&self) -> PlacementPolicy;
}

#[cfg(test)]
#[allow(clippy::module_name_repetitions)]
pub struct TestConfig {
    pub focus_model: std::cell::Cell<FocusModel>,
    pub tab_focus_model: TabFocusModel,
    pub focus_new_windows: bool,
    pub focus_same_head: std::cell::Cell<bool>,
    pub row_direction: std::cell::Cell<RowDirection>,
    pub col_direction: std::cell::Cell<ColDirection>,
    pub placement_policy: std::cell::Cell<PlacementPolicy>,
}

#[cfg(test)]
impl Default for TestConfig {
    fn default() -> Self {
        Self {
            focus_model: std::cell::Cell::new(FocusModel::ClickFocus),
            tab_focus_model: TabFocusModel::ClickToTabFocus,
            focus_new_windows: true,
            focus_same_head: std::cell::Cell::new(false),
            row_direction: std::cell::Cell::new(RowDirection::LeftToRight),
            col_direction: std::cell::Cell::new(ColDirection::TopToBottom),
            placement_policy: std::cell::Cell::new(PlacementPolicy::Cascade),
        }
    }
}

#[cfg(test)]
impl Config for TestConfig {
    fn focus_model(&self) -> FocusModel {
        self.focus_model.get()
    }
    fn tab_focus_model(&self) -> TabFocusModel {
        self.tab_focus_model
    }
    fn focus_new_windows(&self) -> bool {
        self.focus_new_windows
    }
    fn focus_same_head(&self) -> bool {
        self.focus_same_head.get()
    }
    fn row_direction(&self) -> RowDirection {
        self.row_direction.get()
    }
    fn col_direction(&self) -> ColDirection {
        self.col_direction.get()
    }
    fn placement_policy(&self) -> PlacementPolicy {
        self.placement_policy.get()
    }
}
