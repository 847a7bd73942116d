//! Entities the focus and placement engines operate on.
mod focus_registry;
mod geometry;
mod manager;
mod screen;
mod window;

pub use focus_registry::FocusRegistry;
pub use geometry::{Head, Rect};
pub use manager::Manager;
pub use screen::Screen;
pub use window::{
    Client, ClientId, Focusable, FocusProtection, WindowId, WindowStore, WmWindow, XProperty,
};
