//! Focus handling, window placement and the window-matching DSL for a
//! stacking window manager.
// We deny clippy pedantic lints, primarily to keep code as correct as possible
#![warn(clippy::pedantic)]
// Each of these lints are globally allowed because they otherwise make a lot
// of noise.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::default_trait_access
)]
pub mod config;
mod display_action;
pub mod errors;
mod focus_control;
mod focusable_list;
mod handlers;
pub mod models;
pub mod pattern;
pub mod placement;

pub use config::Config;
pub use display_action::DisplayAction;
pub use focus_control::{revert_focus, set_focused_window, unfocus_window, FocusControl};
pub use focusable_list::{FocusableList, ListOptions};
pub use models::Manager;
pub use pattern::{ClientPattern, MatchContext};
pub use placement::{MenuWindow, PlacementStrategy, ScreenPlacement};
