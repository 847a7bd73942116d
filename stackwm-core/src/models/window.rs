//! Client and grouping-window entities and the arena that owns them.
#![allow(clippy::module_name_repetitions)]

use crate::models::Rect;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle to an individual client within a grouping window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u32);

/// Handle to a top-level grouping window (the tabbed container).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

/// A thing that can hold input focus: either one client or a whole
/// grouping window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focusable {
    Client(ClientId),
    Window(WindowId),
}

bitflags! {
    /// Per-window flags governing involuntary focus changes.
    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FocusProtection: u8 {
        /// May gain focus even from a locked window.
        const GAIN = 0b0001;
        /// Never takes focus involuntarily.
        const REFUSE = 0b0010;
        /// Keeps focus; others may not steal it.
        const LOCK = 0b0100;
        /// Denied focus unless explicitly expected.
        const DENY = 0b1000;
    }
}

/// A decoded X property value; text and numeric projections are kept
/// separately because a match may succeed against either.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct XProperty {
    pub text: Option<String>,
    pub num: Option<i64>,
}

/// An individual client window inside a grouping window.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub title: String,
    pub res_class: String,
    pub res_name: String,
    pub wm_role: String,
    pub transient: bool,
    pub modal: bool,
    pub accepts_focus: bool,
    /// Owning grouping window; None for a client not yet attached.
    pub window: Option<WindowId>,
    /// Decoded X properties keyed by external name.
    pub x_properties: HashMap<String, XProperty>,
}

impl Client {
    #[must_use]
    pub fn new(id: ClientId, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            res_class: String::new(),
            res_name: String::new(),
            wm_role: String::new(),
            transient: false,
            modal: false,
            accepts_focus: true,
            window: None,
            x_properties: HashMap::new(),
        }
    }
}

/// A top-level grouping window holding one or more clients.
#[allow(clippy::struct_excessive_bools)]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WmWindow {
    pub id: WindowId,
    pub screen: usize,
    pub workspace: usize,
    pub head: usize,
    pub layer: i32,
    /// Current geometry, possibly grown by tabs or maximization.
    pub current: Rect,
    /// Normal, untabbed geometry.
    pub normal: Rect,
    pub border_width: i32,
    pub titlebar_height: i32,
    /// Extra width/height claimed by external tabs.
    pub tab_offset_x: i32,
    pub tab_offset_y: i32,
    pub iconic: bool,
    pub shaded: bool,
    pub stuck: bool,
    pub fullscreen: bool,
    pub maximized: bool,
    pub maximized_vert: bool,
    pub maximized_horz: bool,
    pub focus_hidden: bool,
    pub icon_hidden: bool,
    pub moving: bool,
    pub focused: bool,
    pub protection: FocusProtection,
    pub clients: Vec<ClientId>,
    pub current_client: Option<ClientId>,
}

impl WmWindow {
    #[must_use]
    pub fn new(id: WindowId, rect: Rect) -> Self {
        Self {
            id,
            screen: 0,
            workspace: 0,
            head: 1,
            layer: 4,
            current: rect,
            normal: rect,
            border_width: 1,
            titlebar_height: 20,
            tab_offset_x: 0,
            tab_offset_y: 0,
            iconic: false,
            shaded: false,
            stuck: false,
            fullscreen: false,
            maximized: false,
            maximized_vert: false,
            maximized_horz: false,
            focus_hidden: false,
            icon_hidden: false,
            moving: false,
            focused: false,
            protection: FocusProtection::empty(),
            clients: Vec::new(),
            current_client: None,
        }
    }
}

/// Slot arena owning every client and grouping window. Handles stay
/// stable for the life of the entity; lookups on a removed handle
/// return `None` instead of dangling.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct WindowStore {
    clients: Vec<Option<Client>>,
    windows: Vec<Option<WmWindow>>,
}

impl WindowStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_client(&mut self, title: &str) -> ClientId {
        let id = ClientId(self.clients.len() as u32);
        self.clients.push(Some(Client::new(id, title)));
        id
    }

    pub fn insert_window(&mut self, rect: Rect) -> WindowId {
        let id = WindowId(self.windows.len() as u32);
        self.windows.push(Some(WmWindow::new(id, rect)));
        id
    }

    /// Attach a client to a grouping window, making it current if the
    /// window has none.
    pub fn attach_client(&mut self, client: ClientId, window: WindowId) {
        if let Some(c) = self.client_mut(client) {
            c.window = Some(window);
        }
        if let Some(w) = self.window_mut(window) {
            if !w.clients.contains(&client) {
                w.clients.push(client);
            }
            if w.current_client.is_none() {
                w.current_client = Some(client);
            }
        }
    }

    #[must_use]
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(id.0 as usize)?.as_ref()
    }

    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(id.0 as usize)?.as_mut()
    }

    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<&WmWindow> {
        self.windows.get(id.0 as usize)?.as_ref()
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut WmWindow> {
        self.windows.get_mut(id.0 as usize)?.as_mut()
    }

    /// The grouping window owning a client, if both are still alive.
    #[must_use]
    pub fn client_window(&self, id: ClientId) -> Option<&WmWindow> {
        self.window(self.client(id)?.window?)
    }

    /// The grouping window behind any focusable: the owner for a
    /// client, the window itself otherwise.
    #[must_use]
    pub fn owning_window(&self, f: Focusable) -> Option<&WmWindow> {
        match f {
            Focusable::Client(c) => self.client_window(c),
            Focusable::Window(w) => self.window(w),
        }
    }

    /// The client a focusable resolves to: itself, or the grouping
    /// window's current client.
    #[must_use]
    pub fn resolve_client(&self, f: Focusable) -> Option<ClientId> {
        match f {
            Focusable::Client(c) => self.client(c).map(|c| c.id),
            Focusable::Window(w) => self.window(w)?.current_client,
        }
    }

    /// True when any client of the window is modal.
    #[must_use]
    pub fn window_is_modal(&self, id: WindowId) -> bool {
        self.window(id).is_some_and(|w| {
            w.clients
                .iter()
                .any(|&c| self.client(c).is_some_and(|c| c.modal))
        })
    }

    #[must_use]
    pub fn is_alive(&self, f: Focusable) -> bool {
        match f {
            Focusable::Client(c) => self.client(c).is_some(),
            Focusable::Window(w) => self.window(w).is_some(),
        }
    }

    pub fn remove_client(&mut self, id: ClientId) {
        let window = self.client(id).and_then(|c| c.window);
        if let Some(slot) = self.clients.get_mut(id.0 as usize) {
            *slot = None;
        }
        if let Some(w) = window.and_then(|w| self.window_mut(w)) {
            w.clients.retain(|&c| c != id);
            if w.current_client == Some(id) {
                w.current_client = w.clients.first().copied();
            }
        }
    }

    pub fn remove_window(&mut self, id: WindowId) {
        let clients = match self.window(id) {
            Some(w) => w.clients.clone(),
            None => return,
        };
        for c in clients {
            if let Some(c) = self.client_mut(c) {
                c.window = None;
            }
        }
        if let Some(slot) = self.windows.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    pub fn windows(&self) -> impl Iterator<Item = &WmWindow> {
        self.windows.iter().filter_map(Option::as_ref)
    }
}
