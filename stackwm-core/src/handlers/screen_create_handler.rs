use crate::config::Config;
use crate::focus_control::FocusControl;
use crate::models::{Manager, Screen};
use crate::placement::ScreenPlacement;

impl<C: Config> Manager<C> {
    /// Register a new screen together with its focus control and
    /// placement engine.
    pub fn screen_create_handler(&mut self, screen: Screen) {
        tracing::debug!("registering screen {}", screen.id);
        self.controls.push(FocusControl::new(screen.id));
        self.placements.push(ScreenPlacement::new());
        self.screens.push(screen);
    }
}
