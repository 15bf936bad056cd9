//! Interfaces the core consumes from the window and display layers

use std::fmt;

use crate::geometry::{Margins, Rect, Region, Size};
use crate::protocol::{ObjectId, Serial};
use crate::states::WindowStates;

/// Identity of a window in the window layer, used for activation bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Seat and serial of the most recent user input
///
/// Move, resize and popup grabs must carry these to prove they stem from a
/// live user gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputContext {
    pub seat: ObjectId,
    pub serial: Serial,
}

/// Window type as requested by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    Normal,
    Dialog,
    Popup,
    ToolTip,
}

impl WindowType {
    fn is_transient_popup(self) -> bool {
        matches!(self, WindowType::Popup | WindowType::ToolTip)
    }

    /// Popups grab input; tooltips never do.
    pub(crate) fn popup_grab(self) -> Option<bool> {
        self.is_transient_popup().then_some(self == WindowType::Popup)
    }
}

/// Protocol objects other surfaces need to reference this one as a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellHandle {
    pub xdg_surface: ObjectId,
    /// Present only when the surface carries the toplevel role
    pub toplevel: Option<ObjectId>,
}

/// The window object a shell surface belongs to
///
/// Passed into every operation that needs it, so the core never keeps a
/// reference back into the window layer.
pub trait ShellWindow {
    fn id(&self) -> WindowId;

    /// The `wl_surface` the shell surface is created from
    fn surface(&self) -> ObjectId;

    /// Absolute geometry of the content area
    fn geometry(&self) -> Rect;

    /// Absolute geometry including decorations
    fn frame_geometry(&self) -> Rect;

    /// States the application currently wants
    fn window_states(&self) -> WindowStates;

    fn resize_from_apply_configure(&mut self, size: Size);

    fn handle_window_states_changed(&mut self, states: WindowStates);

    /// Schedule a call to `ShellSurface::apply_configure` once the window
    /// is ready to commit
    fn apply_configure_when_possible(&mut self);

    /// Decoration insets, `None` when the window is undecorated
    fn decoration_margins(&self) -> Option<Margins>;

    fn handle_expose(&mut self, region: Region);

    fn close(&mut self);

    /// Shell objects of this window, if it has a shell surface
    fn shell_handle(&self) -> Option<ShellHandle>;
}

/// Display-level services shared by all windows of a connection
pub trait DisplayHandler {
    fn window_activated(&self, window: WindowId);

    fn window_deactivated(&self, window: WindowId);

    /// Most recent input, `None` before any input was received
    fn last_input(&self) -> Option<InputContext>;
}
