use crate::config::Config;
use crate::focus_control::revert_focus;
use crate::models::{ClientId, Manager, WindowId};

impl<C: Config> Manager<C> {
    /// A new grouping window appeared: place it per the live policy
    /// and enter it into the window-granularity focus lists.
    pub fn window_created_handler(&mut self, window: WindowId) {
        let Some(screen_id) = self.store.window(window).map(|w| w.screen) else {
            return;
        };
        let Some(index) = self.screens.iter().position(|s| s.id == screen_id) else {
            tracing::warn!("window created on unknown screen {}", screen_id);
            return;
        };
        let placed = self.placements[index].place_window(
            window,
            &self.store,
            &self.registry,
            &self.screens[index],
            &self.config,
        );
        if let Some((x, y)) = placed {
            if let Some(win) = self.store.window_mut(window) {
                win.current.x = x;
                win.current.y = y;
                win.normal.x = x;
                win.normal.y = y;
            }
        }
        let focus_new = self.config.focus_new_windows();
        if let Some(control) = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen_id)
        {
            if focus_new {
                control.add_focus_win_front(window);
            } else {
                control.add_focus_win_back(window);
            }
        }
    }

    /// A client attached to a grouping window; newly focused clients
    /// enter at the front of the focus order and request input focus.
    pub fn client_created_handler(&mut self, client: ClientId, window: WindowId) {
        self.store.attach_client(client, window);
        let Some(win) = self.store.window(window) else {
            return;
        };
        let screen_id = win.screen;
        let take_focus = self.config.focus_new_windows() && !win.focus_hidden;
        if let Some(control) = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen_id)
        {
            if take_focus {
                control.add_focus_front(client);
            } else {
                control.add_focus_back(client);
            }
        }
        if take_focus {
            self.registry.request_input_focus(client);
        }
    }

    /// A client went away. The grouping window survives; if the client
    /// was its current tab, the most recently focused sibling takes
    /// over, and focus reverts if the client held it.
    pub fn client_destroyed_handler(&mut self, client: ClientId) {
        let Some(cl) = self.store.client(client) else {
            return;
        };
        let window = cl.window;
        let screen_id = window
            .and_then(|w| self.store.window(w))
            .map_or(0, |w| w.screen);
        let Some(screen) = self.screens.iter().find(|s| s.id == screen_id).cloned() else {
            return;
        };
        let had_focus = self.registry.focused_client == Some(client);

        let Some(control) = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen_id)
        else {
            return;
        };
        control.remove_client(client, &mut self.registry, &screen);
        // Pick the replacement tab while the focus order still knows
        // the group's clients.
        if let Some(w) = window {
            if self.store.window(w).and_then(|w| w.current_client) == Some(client) {
                let replacement =
                    control.last_focused_window_in_group(w, Some(client), &self.store);
                if let Some(win) = self.store.window_mut(w) {
                    win.current_client = replacement;
                }
            }
        }
        self.store.remove_client(client);
        if had_focus {
            revert_focus(
                &mut self.registry,
                control,
                &mut self.store,
                &screen,
                &self.config,
            );
        }
    }

    /// Iconify a visible window (dropping its focus), or deiconify an
    /// iconic one and hand it focus.
    pub fn toggle_iconified_handler(&mut self, window: WindowId) {
        let Some(win) = self.store.window(window) else {
            return;
        };
        let screen_id = win.screen;
        let Some(screen) = self.screens.iter().find(|s| s.id == screen_id).cloned() else {
            return;
        };
        if win.iconic {
            if let Some(w) = self.store.window_mut(window) {
                w.iconic = false;
            }
            if let Some(client) = self.store.window(window).and_then(|w| w.current_client) {
                self.registry.push_action(crate::display_action::DisplayAction::RaiseWindow(window));
                self.registry.request_input_focus(client);
            }
            return;
        }
        if let Some(w) = self.store.window_mut(window) {
            w.iconic = true;
        }
        if self.registry.focused_window == Some(window) {
            let focused = self.registry.focused_client;
            if let Some(control) = self
                .controls
                .iter_mut()
                .find(|c| c.screen_id() == screen_id)
            {
                if let Some(client) = focused {
                    crate::focus_control::unfocus_window(
                        &mut self.registry,
                        control,
                        &mut self.store,
                        &screen,
                        &self.config,
                        client,
                    );
                }
            }
        }
    }

    /// A grouping window was destroyed with all its clients.
    pub fn window_destroyed_handler(&mut self, window: WindowId) {
        let Some(win) = self.store.window(window) else {
            return;
        };
        let screen_id = win.screen;
        let clients = win.clients.clone();
        let Some(screen) = self.screens.iter().find(|s| s.id == screen_id).cloned() else {
            return;
        };
        let had_focus = self.registry.focused_window == Some(window)
            || clients
                .iter()
                .any(|&c| self.registry.focused_client == Some(c));

        let Some(control) = self
            .controls
            .iter_mut()
            .find(|c| c.screen_id() == screen_id)
        else {
            return;
        };
        for &c in &clients {
            control.remove_client(c, &mut self.registry, &screen);
        }
        control.remove_window(window, &mut self.registry, &screen);
        for c in clients {
            self.store.remove_client(c);
        }
        self.store.remove_window(window);
        if had_focus {
            revert_focus(
                &mut self.registry,
                control,
                &mut self.store,
                &screen,
                &self.config,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PlacementPolicy;
    use crate::display_action::DisplayAction;
    use crate::models::{ClientId, Focusable, Manager, Rect, WindowId};

    fn spawn(manager: &mut Manager<crate::config::TestConfig>, title: &str) -> (ClientId, WindowId) {
        let w = manager.store.insert_window(Rect::new(0, 0, 100, 100));
        manager.store.window_mut(w).unwrap().border_width = 0;
        manager.window_created_handler(w);
        let c = manager.store.insert_client(title);
        manager.client_created_handler(c, w);
        (c, w)
    }

    #[test]
    fn new_windows_cascade_across_the_head() {
        let mut manager = Manager::new_test();
        let (_, a) = spawn(&mut manager, "a");
        let (_, b) = spawn(&mut manager, "b");
        assert_eq!(manager.store.window(a).unwrap().current.x, 0);
        let second = manager.store.window(b).unwrap();
        assert_eq!((second.current.x, second.current.y), (20, 20));
    }

    #[test]
    fn autotab_leaves_the_window_where_the_group_put_it() {
        let mut manager = Manager::new_test();
        manager
            .config
            .placement_policy
            .set(PlacementPolicy::Autotab);
        let w = manager.store.insert_window(Rect::new(123, 45, 100, 100));
        manager.window_created_handler(w);
        let win = manager.store.window(w).unwrap();
        assert_eq!((win.current.x, win.current.y), (123, 45));
    }

    #[test]
    fn new_clients_request_focus_when_configured() {
        let mut manager = Manager::new_test();
        let (c, _) = spawn(&mut manager, "a");
        assert!(manager
            .registry
            .actions
            .contains(&DisplayAction::SetInputFocus(c)));
        assert_eq!(
            manager.controls[0].focused_order().first(),
            Some(Focusable::Client(c))
        );
    }

    #[test]
    fn unfocused_creation_joins_the_back_of_the_order() {
        let mut manager = Manager::new_test();
        manager.config.focus_new_windows = false;
        let (a, _) = spawn(&mut manager, "a");
        let (b, _) = spawn(&mut manager, "b");
        assert!(manager.registry.actions.is_empty());
        let order: Vec<Focusable> = manager.controls[0].focused_order().iter().collect();
        assert_eq!(order, vec![Focusable::Client(a), Focusable::Client(b)]);
    }

    #[test]
    fn destroying_the_focused_window_reverts_focus() {
        let mut manager = Manager::new_test();
        let (a, _) = spawn(&mut manager, "a");
        let (b, bw) = spawn(&mut manager, "b");
        manager.focus_in_handler(Some(a));
        manager.focus_in_handler(Some(b));
        manager.registry.actions.clear();

        manager.window_destroyed_handler(bw);
        assert!(manager.store.window(bw).is_none());
        assert!(manager.store.client(b).is_none());
        assert_eq!(
            manager.registry.actions.front(),
            Some(&DisplayAction::SetInputFocus(a))
        );
    }

    #[test]
    fn iconifying_the_focused_window_reverts_and_back() {
        let mut manager = Manager::new_test();
        let (a, _) = spawn(&mut manager, "a");
        let (b, bw) = spawn(&mut manager, "b");
        manager.focus_in_handler(Some(a));
        manager.focus_in_handler(Some(b));
        manager.registry.actions.clear();

        manager.toggle_iconified_handler(bw);
        assert!(manager.store.window(bw).unwrap().iconic);
        assert_eq!(
            manager.registry.actions.front(),
            Some(&DisplayAction::SetInputFocus(a))
        );
        manager.registry.actions.clear();

        manager.toggle_iconified_handler(bw);
        assert!(!manager.store.window(bw).unwrap().iconic);
        assert!(manager
            .registry
            .actions
            .contains(&DisplayAction::SetInputFocus(b)));
        assert!(manager
            .registry
            .actions
            .contains(&DisplayAction::RaiseWindow(bw)));
    }

    #[test]
    fn destroying_the_current_tab_promotes_the_recent_sibling() {
        let mut manager = Manager::new_test();
        let (t1, gw) = spawn(&mut manager, "tab1");
        let t2 = manager.store.insert_client("tab2");
        manager.client_created_handler(t2, gw);
        let t3 = manager.store.insert_client("tab3");
        manager.client_created_handler(t3, gw);
        manager.focus_in_handler(Some(t1));
        manager.focus_in_handler(Some(t2));
        manager.focus_in_handler(Some(t1));
        assert_eq!(manager.store.window(gw).unwrap().current_client, Some(t1));

        manager.client_destroyed_handler(t1);
        // t2 was focused more recently than t3.
        assert_eq!(manager.store.window(gw).unwrap().current_client, Some(t2));
        assert!(manager.store.window(gw).unwrap().clients.contains(&t3));
    }
}
