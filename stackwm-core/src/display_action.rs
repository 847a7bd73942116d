use crate::models::{ClientId, WindowId};
use serde::{Deserialize, Serialize};

/// Requests for the display server. Focus requests are asynchronous at
/// the protocol level: a `SetInputFocus` is not reflected in the focus
/// registry until the matching focus-in event is dispatched back into
/// `set_focused_window`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayAction {
    /// Ask the server to give a client input focus.
    SetInputFocus(ClientId),

    /// Raise a grouping window to the top of its layer.
    RaiseWindow(WindowId),

    /// Give focus to the visible menu.
    FocusMenu,

    /// Focus follows the pointer; used by the mouse focus models when
    /// nothing is left to focus.
    FocusPointerRoot,

    /// Focus the root window, reverting to pointer-root; used by the
    /// click focus model when nothing is left to focus.
    FocusRootRevertPointer,

    /// Warp the pointer to a point.
    WarpPointer(i32, i32),
}
