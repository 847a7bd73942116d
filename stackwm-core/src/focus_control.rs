//! Per-screen focus-order tracking and the focus-cycling state machine.
use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::errors::Result;
use crate::focusable_list::{FocusableList, ListOptions};
use crate::models::{
    ClientId, Focusable, FocusProtection, FocusRegistry, Screen, WindowId, WindowStore,
};
use crate::pattern::{ClientPattern, MatchContext};

/// State of an in-progress cycling gesture. `list == None` means idle.
#[derive(Debug, Default)]
struct CycleState {
    /// Owned copy of the list being cycled; compared by view identity
    /// to decide whether a call continues the same gesture.
    list: Option<FocusableList>,
    /// Cursor into the cycled list, kept as a stable handle and
    /// re-resolved to a position on each step.
    cursor: Option<Focusable>,
    /// What the currently peeked window had selected before we
    /// started touching it.
    last: Option<ClientId>,
    /// The candidate the gesture currently points at.
    next: Option<ClientId>,
    /// Window that was iconic when the gesture peeked it.
    was_iconic: Option<WindowId>,
}

/// Focus bookkeeping for one screen: the four canonical lists, the
/// cycling gesture, and the pointer-event suppression cache.
#[derive(Debug)]
pub struct FocusControl {
    screen_id: usize,
    focused_list: FocusableList,
    creation_list: FocusableList,
    focused_win_list: FocusableList,
    creation_win_list: FocusableList,
    cycle: CycleState,
    /// Coordinate at which the next pointer-entry focus change is
    /// suppressed, armed after programmatic raises and warps.
    ignore_pointer: Option<(i32, i32)>,
}

impl FocusControl {
    #[must_use]
    pub fn new(screen_id: usize) -> Self {
        let opts = |static_order, groups| ListOptions {
            static_order,
            groups,
        };
        Self {
            screen_id,
            focused_list: FocusableList::new(opts(false, false)),
            creation_list: FocusableList::new(opts(true, false)),
            focused_win_list: FocusableList::new(opts(false, true)),
            creation_win_list: FocusableList::new(opts(true, true)),
            cycle: CycleState::default(),
            ignore_pointer: None,
        }
    }

    #[must_use]
    pub fn screen_id(&self) -> usize {
        self.screen_id
    }

    /// One of the four canonical lists, selected by option bits.
    #[must_use]
    pub fn canonical_list(&self, opts: ListOptions) -> &FocusableList {
        match (opts.static_order, opts.groups) {
            (false, false) => &self.focused_list,
            (true, false) => &self.creation_list,
            (false, true) => &self.focused_win_list,
            (true, true) => &self.creation_win_list,
        }
    }

    /// Build a filtered list from the `{opts} pattern` mini-syntax
    /// against the matching canonical list.
    pub fn list_from_config_str(
        &self,
        source: &str,
        store: &WindowStore,
        ctx: &MatchContext,
    ) -> Result<FocusableList> {
        let (opts, rest) = ListOptions::parse(source);
        let parent = self.canonical_list(opts);
        FocusableList::from_pattern_str(rest.trim(), parent, store, ctx)
    }

    #[must_use]
    pub fn focused_order(&self) -> &FocusableList {
        &self.focused_list
    }

    #[must_use]
    pub fn creation_order(&self) -> &FocusableList {
        &self.creation_list
    }

    #[must_use]
    pub fn focused_window_order(&self) -> &FocusableList {
        &self.focused_win_list
    }

    #[must_use]
    pub fn creation_window_order(&self) -> &FocusableList {
        &self.creation_win_list
    }

    #[must_use]
    pub fn is_cycling(&self) -> bool {
        self.cycle.list.is_some()
    }

    /// The candidate an in-progress gesture points at.
    #[must_use]
    pub fn cycling_next(&self) -> Option<ClientId> {
        self.cycle.next
    }

    /// Advance the cycling gesture one step, or perform an independent
    /// single step when no cycling modifier is held.
    #[allow(clippy::too_many_arguments)]
    pub fn cycle_focus(
        &mut self,
        list: &FocusableList,
        pattern: Option<&ClientPattern>,
        reverse: bool,
        store: &mut WindowStore,
        registry: &mut FocusRegistry,
        screen: &Screen,
    ) {
        let interactive = screen.cycling_gesture_active;
        let same = self.cycle.list.as_ref().is_some_and(|l| l.same_view(list));
        if !same {
            self.cycle = CycleState::default();
            if interactive {
                self.cycle.list = Some(list.clone());
            }
        }
        let n = list.len();
        if n == 0 {
            return;
        }

        let ctx = MatchContext::new(screen, registry.focused());
        // Resolve the starting cursor; a vanished reference falls back
        // through focused client, focused window, then end-of-list.
        let start = self
            .cycle
            .next
            .and_then(|c| list.position(Focusable::Client(c)))
            .or_else(|| {
                registry
                    .focused_client
                    .and_then(|c| list.position(Focusable::Client(c)))
            })
            .or_else(|| {
                registry
                    .focused_window
                    .and_then(|w| list.position(Focusable::Window(w)))
            });

        let step = |i: usize| {
            if reverse {
                (i + n - 1) % n
            } else {
                (i + 1) % n
            }
        };
        let begin = match start {
            Some(s) => step(s),
            None => {
                if reverse {
                    n - 1
                } else {
                    0
                }
            }
        };
        let mut found = None;
        let mut idx = begin;
        for _ in 0..n {
            // Returning to the starting position means nothing was
            // acceptable; give up without touching any state.
            if Some(idx) == start {
                break;
            }
            if let Some(entry) = list.get(idx) {
                if store.is_alive(entry) && !do_skip_window(store, &ctx, entry, pattern) {
                    found = Some(entry);
                    break;
                }
            }
            idx = step(idx);
        }
        let Some(entry) = found else {
            return;
        };
        let Some(client) = store.resolve_client(entry) else {
            return;
        };
        let Some(winid) = store.owning_window(entry).map(|w| w.id) else {
            return;
        };

        // Raise immediately for a discrete "next window" step; an
        // interactive gesture defers raising to stop_cycling_focus.
        if !interactive {
            registry.push_action(DisplayAction::RaiseWindow(winid));
        }

        let prev_window = self
            .cycle
            .next
            .and_then(|c| store.client(c))
            .and_then(|c| c.window);
        if prev_window != Some(winid) {
            if self.cycle.next.is_some() {
                // Undo the speculative peek on the window we are
                // leaving: restore its selected client and iconic
                // state from before the gesture touched it.
                if let Some(pw) = prev_window {
                    if let Some(last) = self.cycle.last {
                        if let Some(w) = store.window_mut(pw) {
                            w.current_client = Some(last);
                        }
                    }
                    if self.cycle.was_iconic == Some(pw) {
                        if let Some(w) = store.window_mut(pw) {
                            w.iconic = true;
                        }
                    }
                }
            }
            self.cycle.last = store.window(winid).and_then(|w| w.current_client);
            self.cycle.was_iconic = store
                .window(winid)
                .and_then(|w| w.iconic.then_some(winid));
        }

        self.cycle.cursor = Some(entry);
        self.cycle.next = Some(client);
        if let Some(w) = store.window_mut(winid) {
            w.iconic = false;
            w.current_client = Some(client);
        }
        registry.request_input_focus(client);
    }

    /// End an interactive gesture. Idempotent; re-asserts the focused
    /// window's place at the front of the focus order.
    pub fn stop_cycling_focus(
        &mut self,
        store: &mut WindowStore,
        registry: &mut FocusRegistry,
        screen: &Screen,
        config: &dyn Config,
    ) {
        if self.cycle.list.is_none() {
            return;
        }
        self.cycle = CycleState::default();
        match registry.focused_client {
            Some(c) => {
                if let Some(w) = store.client(c).and_then(|c| c.window) {
                    registry.push_action(DisplayAction::RaiseWindow(w));
                }
                self.set_screen_focused_window(c, store, registry, screen);
            }
            None => revert_focus(registry, self, store, screen, config),
        }
    }

    /// Focus the n-th acceptable candidate of a list, 1-indexed; the
    /// sign of `num` selects the walk direction. Silent no-op when
    /// fewer candidates exist.
    pub fn goto_window_number(
        &self,
        list: &FocusableList,
        num: i32,
        pattern: Option<&ClientPattern>,
        store: &WindowStore,
        registry: &mut FocusRegistry,
        screen: &Screen,
    ) {
        if num == 0 {
            return;
        }
        let ctx = MatchContext::new(screen, registry.focused());
        let want = num.unsigned_abs() as usize;
        let forward: Vec<Focusable> = if num > 0 {
            list.iter().collect()
        } else {
            list.iter().rev().collect()
        };
        let mut seen = 0;
        for entry in forward {
            if !store.is_alive(entry) || do_skip_window(store, &ctx, entry, pattern) {
                continue;
            }
            let Some(client) = store.resolve_client(entry) else {
                continue;
            };
            if !store.client(client).is_some_and(|c| c.accepts_focus) {
                continue;
            }
            seen += 1;
            if seen == want {
                if let Some(w) = store.client(client).and_then(|c| c.window) {
                    registry.push_action(DisplayAction::RaiseWindow(w));
                }
                registry.request_input_focus(client);
                return;
            }
        }
    }

    /// A client about to be focused: front of the focus order.
    /// Creation order is append-only either way.
    pub fn add_focus_front(&mut self, client: ClientId) {
        self.focused_list.push_front(Focusable::Client(client));
        self.creation_list.push_back(Focusable::Client(client));
    }

    /// A client created without focus: back of the focus order.
    pub fn add_focus_back(&mut self, client: ClientId) {
        self.focused_list.push_back(Focusable::Client(client));
        self.creation_list.push_back(Focusable::Client(client));
    }

    pub fn add_focus_win_front(&mut self, window: WindowId) {
        self.focused_win_list.push_front(Focusable::Window(window));
        self.creation_win_list.push_back(Focusable::Window(window));
    }

    pub fn add_focus_win_back(&mut self, window: WindowId) {
        self.focused_win_list.push_back(Focusable::Window(window));
        self.creation_win_list.push_back(Focusable::Window(window));
    }

    /// Push a whole grouping window and its clients to the back of the
    /// focus order. Suppressed mid-cycle and mid-revert so an order
    /// already being rebuilt is not corrupted.
    pub fn set_focus_back(
        &mut self,
        window: WindowId,
        store: &WindowStore,
        registry: &FocusRegistry,
    ) {
        if self.is_cycling() || registry.reverting {
            return;
        }
        self.focused_win_list.move_to_back(Focusable::Window(window));
        if let Some(w) = store.window(window) {
            for &c in &w.clients {
                self.focused_list.move_to_back(Focusable::Client(c));
            }
        }
    }

    /// Move the newly focused client and its window to the front of
    /// the focus order. Suppressed while cycling, shutting down or
    /// reverting.
    pub fn set_screen_focused_window(
        &mut self,
        client: ClientId,
        store: &WindowStore,
        registry: &FocusRegistry,
        screen: &Screen,
    ) {
        if self.is_cycling() || registry.reverting || screen.shutting_down {
            return;
        }
        self.focused_list.move_to_front(Focusable::Client(client));
        if let Some(w) = store.client(client).and_then(|c| c.window) {
            self.focused_win_list.move_to_front(Focusable::Window(w));
        }
    }

    /// Most recently focused client acceptable on a workspace. An
    /// out-of-range workspace returns the absolute front of the focus
    /// order.
    pub fn last_focused_window(
        &self,
        workspace: usize,
        store: &WindowStore,
        registry: &FocusRegistry,
        screen: &Screen,
        config: &dyn Config,
    ) -> Option<ClientId> {
        if workspace >= screen.workspace_count() {
            return self.focused_list.first().and_then(|f| store.resolve_client(f));
        }
        // Head affinity only applies while the focused window is not
        // mid-move.
        let focused_head = registry
            .focused_window
            .and_then(|w| store.window(w))
            .and_then(|w| (!w.moving).then_some(w.head));
        for entry in self.focused_list.iter() {
            let Focusable::Client(c) = entry else {
                continue;
            };
            let Some(client) = store.client(c) else {
                continue;
            };
            if !client.accepts_focus {
                continue;
            }
            let Some(win) = client.window.and_then(|w| store.window(w)) else {
                continue;
            };
            if config.focus_same_head() {
                if let Some(head) = focused_head {
                    if win.head != head {
                        continue;
                    }
                }
            }
            if win.iconic {
                continue;
            }
            if win.workspace == workspace || win.stuck {
                return Some(c);
            }
        }
        None
    }

    /// Most recently focused client belonging to a tab group, skipping
    /// one; used to pick the replacement when the active tab goes away.
    pub fn last_focused_window_in_group(
        &self,
        group: WindowId,
        ignore: Option<ClientId>,
        store: &WindowStore,
    ) -> Option<ClientId> {
        self.focused_list.iter().find_map(|entry| {
            let Focusable::Client(c) = entry else {
                return None;
            };
            if Some(c) == ignore {
                return None;
            }
            (store.client(c)?.window? == group).then_some(c)
        })
    }

    /// Arm the pointer-entry suppression at a coordinate. Only armed
    /// under the mouse focus models unless forced.
    pub fn ignore_at(&mut self, x: i32, y: i32, force: bool, config: &dyn Config) {
        if force || config.focus_model().follows_mouse() {
            self.ignore_pointer = Some((x, y));
        }
    }

    pub fn ignore_at_pointer(&mut self, screen: &Screen, force: bool, config: &dyn Config) {
        self.ignore_at(screen.pointer.0, screen.pointer.1, force, config);
    }

    #[must_use]
    pub fn is_ignored(&self, x: i32, y: i32) -> bool {
        self.ignore_pointer == Some((x, y))
    }

    /// Take a client out of the focus bookkeeping, reconciling the
    /// cycling gesture before the lists change. No-op at shutdown.
    pub fn remove_client(
        &mut self,
        client: ClientId,
        registry: &mut FocusRegistry,
        screen: &Screen,
    ) {
        if screen.shutting_down {
            return;
        }
        if self.cycle.cursor == Some(Focusable::Client(client)) || self.cycle.next == Some(client)
        {
            tracing::debug!("cycled-to client removed, stopping cycle");
            self.cycle = CycleState::default();
        } else {
            if self.cycle.last == Some(client) {
                self.cycle.last = None;
            }
            if let Some(list) = self.cycle.list.as_mut() {
                list.remove(Focusable::Client(client));
            }
        }
        self.focused_list.remove(Focusable::Client(client));
        self.creation_list.remove(Focusable::Client(client));
        if registry.focused_client == Some(client) {
            registry.focused_client = None;
            registry.focused_window = None;
        }
        if registry.expecting_focus == Some(client) {
            registry.expecting_focus = None;
        }
    }

    pub fn remove_window(
        &mut self,
        window: WindowId,
        registry: &mut FocusRegistry,
        screen: &Screen,
    ) {
        if screen.shutting_down {
            return;
        }
        if self.cycle.cursor == Some(Focusable::Window(window)) {
            self.cycle = CycleState::default();
        } else if let Some(list) = self.cycle.list.as_mut() {
            list.remove(Focusable::Window(window));
        }
        self.focused_win_list.remove(Focusable::Window(window));
        self.creation_win_list.remove(Focusable::Window(window));
        if registry.focused_window == Some(window) {
            registry.focused_window = None;
        }
    }
}

/// Whether cycling and numbered focus walks pass over an entry: no
/// owning window, focus-hidden, modal, or failing the supplied filter.
fn do_skip_window(
    store: &WindowStore,
    ctx: &MatchContext,
    entry: Focusable,
    pattern: Option<&ClientPattern>,
) -> bool {
    let Some(win) = store.owning_window(entry) else {
        return true;
    };
    if win.focus_hidden || store.window_is_modal(win.id) {
        return true;
    }
    if store.resolve_client(entry).is_none() {
        return true;
    }
    pattern.is_some_and(|p| !p.matches(entry, store, ctx))
}

/// Dispatch a focus-in confirmation (or a programmatic focus change)
/// into the registry. The single most involved operation of the core:
/// handles cycling redirects, focus protection, and the unfocusable
/// fallback.
pub fn set_focused_window(
    registry: &mut FocusRegistry,
    controls: &mut [FocusControl],
    store: &mut WindowStore,
    screens: &[Screen],
    client: Option<ClientId>,
) {
    // Resolve to a live client with a live, non-iconic owning window.
    let resolved = client.and_then(|c| {
        let win = store.client_window(c)?;
        (!win.iconic).then(|| (c, win.id, win.screen))
    });

    if client.is_some() && client == registry.focused_client {
        if let Some((_, w, _)) = resolved {
            if registry.focused_window == Some(w) {
                return;
            }
        }
    }

    if let Some(c) = client {
        let sid = store.client_window(c).map_or(0, |w| w.screen);
        let control = controls.iter().find(|ctl| ctl.screen_id == sid);
        let cycling = control.is_some_and(FocusControl::is_cycling);
        if cycling {
            // An async focus claim mid-gesture is redirected back to
            // the gesture's intended candidate, unless the claimant is
            // that candidate.
            if let Some(next) = control.and_then(|ctl| ctl.cycle.next) {
                if c != next {
                    registry.request_input_focus(next);
                    return;
                }
            }
        } else if registry.expecting_focus != Some(c)
            && registry.focused_window != store.client(c).and_then(|x| x.window)
        {
            let prev_locked = registry
                .focused_window
                .and_then(|w| store.window(w))
                .is_some_and(|w| w.protection.contains(FocusProtection::LOCK));
            let taker_denied = store
                .client_window(c)
                .is_some_and(|w| w.protection.contains(FocusProtection::DENY));
            if prev_locked || taker_denied {
                tracing::debug!("focus request refused by focus protection");
                if let Some(prev) = registry.focused_client {
                    registry.request_input_focus(prev);
                }
                return;
            }
        }
    }

    let old_window = registry.focused_window;
    match resolved {
        Some((c, winid, sid)) => {
            if old_window != Some(winid) {
                if let Some(ow) = old_window.and_then(|ow| store.window_mut(ow)) {
                    ow.focused = false;
                }
            }
            registry.focused_client = Some(c);
            registry.focused_window = Some(winid);
            if let Some(win) = store.window_mut(winid) {
                // Mark the current tab without forcing another input
                // focus round trip.
                win.current_client = Some(c);
                win.focused = true;
            }
            registry.expecting_focus = None;
            if let Some(control) = controls.iter_mut().find(|ctl| ctl.screen_id == sid) {
                if let Some(screen) = screens.iter().find(|s| s.id == sid) {
                    control.set_screen_focused_window(c, store, registry, screen);
                }
            }
        }
        // Unfocusable candidate: a root, background or menu click.
        None => {
            if let Some(ow) = old_window.and_then(|ow| store.window_mut(ow)) {
                ow.focused = false;
            }
            registry.focused_client = None;
            registry.focused_window = None;
        }
    }
}

/// Give focus to the best remaining window on a screen, falling back
/// to a visible menu or the policy-determined root focus. Never fails;
/// the reverting guard is cleared on every path.
pub fn revert_focus(
    registry: &mut FocusRegistry,
    control: &mut FocusControl,
    store: &mut WindowStore,
    screen: &Screen,
    config: &dyn Config,
) {
    if registry.reverting || screen.shutting_down {
        return;
    }
    let next = control.last_focused_window(screen.current_workspace, store, registry, screen, config);
    match next {
        Some(client) => {
            if store.client_window(client).is_some_and(|w| w.stuck) {
                // A revert onto a sticky window must not disturb the
                // focus order.
                registry.reverting = true;
            }
            registry.request_input_focus(client);
        }
        None => {
            if let Some(ow) = registry.focused_window.and_then(|w| store.window_mut(w)) {
                ow.focused = false;
            }
            registry.focused_client = None;
            registry.focused_window = None;
            if screen.menu_visible {
                registry.push_action(DisplayAction::FocusMenu);
            } else if config.focus_model().follows_mouse() {
                registry.push_action(DisplayAction::FocusPointerRoot);
            } else {
                registry.push_action(DisplayAction::FocusRootRevertPointer);
            }
        }
    }
    registry.reverting = false;
}

/// Revert focus away from a client that is being iconified or hidden,
/// if it currently holds focus.
pub fn unfocus_window(
    registry: &mut FocusRegistry,
    control: &mut FocusControl,
    store: &mut WindowStore,
    screen: &Screen,
    config: &dyn Config,
    client: ClientId,
) {
    if registry.focused_client == Some(client) && !registry.reverting {
        registry.focused_client = None;
        registry.focused_window = None;
        revert_focus(registry, control, store, screen, config);
    }
}
