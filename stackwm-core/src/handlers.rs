//! Event entry points, grouped by concern; all are methods on
//! [`crate::models::Manager`].
mod focus_handler;
mod screen_create_handler;
mod window_handler;
