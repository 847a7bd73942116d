use crate::config::Config;
use crate::errors::{Result, StackError};
use crate::focus_control::{revert_focus, set_focused_window, unfocus_window};
use crate::models::{ClientId, Manager};
use crate::pattern::MatchContext;

impl<C: Config> Manager<C> {
    /// A focus-in confirmation from the server, or a programmatic
    /// focus change; `None` means the root or background was focused.
    pub fn focus_in_handler(&mut self, client: Option<ClientId>) {
        set_focused_window(
            &mut self.registry,
            &mut self.controls,
            &mut self.store,
            &self.screens,
            client,
        );
    }

    /// Step the cycling gesture over the list a `{opts} pattern`
    /// selector denotes.
    pub fn cycle_focus_handler(&mut self, screen: usize, selector: &str, reverse: bool) -> Result<()> {
        let screen = self.screen(screen)?.clone();
        let ctx = MatchContext::new(&screen, self.registry.focused());
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen.id)
            .ok_or(StackError::UnknownScreen(screen.id))?;
        let list = control.list_from_config_str(selector, &self.store, &ctx)?;
        control.cycle_focus(
            &list,
            None,
            reverse,
            &mut self.store,
            &mut self.registry,
            &screen,
        );
        Ok(())
    }

    /// The cycling modifier was released.
    pub fn stop_cycling_handler(&mut self, screen: usize) -> Result<()> {
        let screen = self.screen(screen)?.clone();
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen.id)
            .ok_or(StackError::UnknownScreen(screen.id))?;
        control.stop_cycling_focus(&mut self.store, &mut self.registry, &screen, &self.config);
        Ok(())
    }

    /// Focus the n-th window of the list a selector denotes; negative
    /// numbers count from the end.
    pub fn goto_window_handler(&mut self, screen: usize, selector: &str, num: i32) -> Result<()> {
        let screen = self.screen(screen)?.clone();
        let ctx = MatchContext::new(&screen, self.registry.focused());
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen.id)
            .ok_or(StackError::UnknownScreen(screen.id))?;
        let list = control.list_from_config_str(selector, &self.store, &ctx)?;
        control.goto_window_number(&list, num, None, &self.store, &mut self.registry, &screen);
        Ok(())
    }

    /// Give focus to the best remaining window on a screen.
    pub fn revert_focus_handler(&mut self, screen: usize) -> Result<()> {
        let screen = self.screen(screen)?.clone();
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen.id)
            .ok_or(StackError::UnknownScreen(screen.id))?;
        revert_focus(
            &mut self.registry,
            control,
            &mut self.store,
            &screen,
            &self.config,
        );
        Ok(())
    }

    /// Warp the pointer, arming the ignore cache first so the
    /// synthetic enter event at the target does not refocus under the
    /// mouse focus models.
    pub fn warp_pointer_handler(&mut self, screen: usize, x: i32, y: i32) -> Result<()> {
        let id = self.screen(screen)?.id;
        if let Some(control) = self.controls.iter_mut().find(|c| c.screen_id() == id) {
            control.ignore_at(x, y, false, &self.config);
        }
        if let Some(screen) = self.screens.iter_mut().find(|s| s.id == id) {
            screen.pointer = (x, y);
        }
        self.registry
            .push_action(crate::display_action::DisplayAction::WarpPointer(x, y));
        Ok(())
    }

    /// Drop focus from a client that is being iconified or hidden.
    pub fn unfocus_handler(&mut self, screen: usize, client: ClientId) -> Result<()> {
        let screen = self.screen(screen)?.clone();
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen.id)
            .ok_or(StackError::UnknownScreen(screen.id))?;
        unfocus_window(
            &mut self.registry,
            control,
            &mut self.store,
            &screen,
            &self.config,
            client,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::display_action::DisplayAction;
    use crate::models::{ClientId, Manager, Rect, WindowId};

    fn spawn(manager: &mut Manager<crate::config::TestConfig>, title: &str) -> (ClientId, WindowId) {
        let w = manager.store.insert_window(Rect::new(0, 0, 100, 100));
        manager.window_created_handler(w);
        let c = manager.store.insert_client(title);
        manager.client_created_handler(c, w);
        (c, w)
    }

    #[test]
    fn selector_drives_a_filtered_cycle() {
        let mut manager = Manager::new_test();
        let (a, _) = spawn(&mut manager, "xterm");
        manager.store.client_mut(a).unwrap().title = "xterm".into();
        let (b, _) = spawn(&mut manager, "browser");
        manager.store.client_mut(b).unwrap().title = "browser".into();
        manager.focus_in_handler(Some(a));
        manager.registry.actions.clear();

        manager.screens[0].cycling_gesture_active = true;
        manager.cycle_focus_handler(0, "(title=xterm)", false).unwrap();
        // Only a matches, and the walk never returns to its start, so
        // nothing is focused.
        assert!(manager.registry.actions.is_empty());

        manager.cycle_focus_handler(0, "(title=.*)", false).unwrap();
        assert_eq!(
            manager.registry.actions.front(),
            Some(&DisplayAction::SetInputFocus(b))
        );
        manager.stop_cycling_handler(0).unwrap();
    }

    #[test]
    fn bad_selector_pattern_is_an_error() {
        let mut manager = Manager::new_test();
        assert!(manager.cycle_focus_handler(0, "(*oops)", false).is_err());
    }

    #[test]
    fn unknown_screen_is_an_error() {
        let mut manager = Manager::new_test();
        assert!(manager.revert_focus_handler(7).is_err());
    }

    #[test]
    fn warping_arms_the_ignore_cache_under_mouse_focus() {
        let mut manager = Manager::new_test();
        manager
            .config
            .focus_model
            .set(crate::config::FocusModel::MouseFocus);
        manager.warp_pointer_handler(0, 42, 7).unwrap();
        assert_eq!(manager.screens[0].pointer, (42, 7));
        assert!(manager.controls[0].is_ignored(42, 7));
        assert_eq!(
            manager.registry.actions.front(),
            Some(&DisplayAction::WarpPointer(42, 7))
        );
    }

    #[test]
    fn unfocus_reverts_only_when_the_client_held_focus() {
        let mut manager = Manager::new_test();
        let (a, aw) = spawn(&mut manager, "a");
        let (b, _) = spawn(&mut manager, "b");
        manager.focus_in_handler(Some(a));
        manager.registry.actions.clear();

        manager.unfocus_handler(0, b).unwrap();
        assert!(manager.registry.actions.is_empty());

        // The usual sequence: the window is iconified first, then its
        // focus is dropped.
        manager.store.window_mut(aw).unwrap().iconic = true;
        manager.unfocus_handler(0, a).unwrap();
        assert_eq!(
            manager.registry.actions.front(),
            Some(&DisplayAction::SetInputFocus(b))
        );
    }
}
