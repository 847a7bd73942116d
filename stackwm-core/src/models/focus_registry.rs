//! The shared focus state every screen reads and writes.
use crate::display_action::DisplayAction;
use crate::models::{ClientId, Focusable, WindowId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Process-wide focus pointers, shared by all screens. One registry
/// exists per manager; it replaces hidden global state with an
/// explicitly owned context object.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct FocusRegistry {
    /// The client confirmed to hold input focus.
    pub focused_client: Option<ClientId>,
    /// The grouping window of `focused_client`.
    pub focused_window: Option<WindowId>,
    /// Set just before a focus grab so the asynchronous focus-in event
    /// can be correlated with the request that caused it.
    pub expecting_focus: Option<ClientId>,
    /// Guard breaking recursive focus reverts; not a lock, everything
    /// here runs on the one event thread.
    pub reverting: bool,
    /// Requests for the display server, drained by the event loop.
    pub actions: VecDeque<DisplayAction>,
}

impl FocusRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused entity as a focusable, preferring the client.
    #[must_use]
    pub fn focused(&self) -> Option<Focusable> {
        self.focused_client
            .map(Focusable::Client)
            .or(self.focused_window.map(Focusable::Window))
    }

    /// Queue an input-focus request and arm the expecting pointer.
    pub fn request_input_focus(&mut self, client: ClientId) {
        self.expecting_focus = Some(client);
        self.actions.push_back(DisplayAction::SetInputFocus(client));
    }

    pub fn push_action(&mut self, action: DisplayAction) {
        self.actions.push_back(action);
    }
}
