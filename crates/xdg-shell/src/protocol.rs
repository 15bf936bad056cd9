//! Typed protocol surface
//!
//! Outbound requests and inbound events of the xdg-shell interfaces, as the
//! core sees them. Encoding is the transport's job: the core only allocates
//! object ids and hands fully-formed [`Request`]s to a [`Transport`].

use std::fmt;

use crate::geometry::{Rect, Size};

/// Serial numbers correlate configures with acks and gate gesture requests
pub type Serial = u32;

/// Client-side handle of a protocol object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interfaces the core creates objects of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interface {
    WmBase,
    XdgSurface,
    Toplevel,
    Popup,
    Positioner,
}

impl Interface {
    pub fn name(self) -> &'static str {
        match self {
            Interface::WmBase => "xdg_wm_base",
            Interface::XdgSurface => "xdg_surface",
            Interface::Toplevel => "xdg_toplevel",
            Interface::Popup => "xdg_popup",
            Interface::Positioner => "xdg_positioner",
        }
    }
}

/// Edge or corner being dragged in an interactive resize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ResizeEdge {
    None = 0,
    Top = 1,
    Bottom = 2,
    Left = 4,
    TopLeft = 5,
    BottomLeft = 6,
    Right = 8,
    TopRight = 9,
    BottomRight = 10,
}

impl ResizeEdge {
    /// Convert a raw edge value. `wl_shell_surface.resize` uses the same
    /// numbering, so legacy callers go through here as well.
    pub fn from_raw(raw: u32) -> Option<ResizeEdge> {
        Some(match raw {
            0 => ResizeEdge::None,
            1 => ResizeEdge::Top,
            2 => ResizeEdge::Bottom,
            4 => ResizeEdge::Left,
            5 => ResizeEdge::TopLeft,
            6 => ResizeEdge::BottomLeft,
            8 => ResizeEdge::Right,
            9 => ResizeEdge::TopRight,
            10 => ResizeEdge::BottomRight,
            _ => return None,
        })
    }

    pub fn raw(self) -> u32 {
        self as u32
    }
}

/// Positioner anchor point on the anchor rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Anchor {
    None = 0,
    Top = 1,
    Bottom = 2,
    Left = 3,
    Right = 4,
    TopLeft = 5,
    BottomLeft = 6,
    TopRight = 7,
    BottomRight = 8,
}

/// Direction a popup extends from its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Gravity {
    None = 0,
    Top = 1,
    Bottom = 2,
    Left = 3,
    Right = 4,
    TopLeft = 5,
    BottomLeft = 6,
    TopRight = 7,
    BottomRight = 8,
}

/// Outbound requests, one variant per protocol message the core emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    // xdg_wm_base
    Pong { wm_base: ObjectId, serial: Serial },
    CreatePositioner { wm_base: ObjectId, id: ObjectId },
    GetXdgSurface { wm_base: ObjectId, id: ObjectId, surface: ObjectId },
    DestroyWmBase { wm_base: ObjectId },

    // xdg_surface
    GetToplevel { xdg_surface: ObjectId, id: ObjectId },
    GetPopup { xdg_surface: ObjectId, id: ObjectId, parent: ObjectId, positioner: ObjectId },
    AckConfigure { xdg_surface: ObjectId, serial: Serial },
    DestroyXdgSurface { xdg_surface: ObjectId },

    // xdg_toplevel
    SetTitle { toplevel: ObjectId, title: String },
    SetAppId { toplevel: ObjectId, app_id: String },
    SetParent { toplevel: ObjectId, parent: Option<ObjectId> },
    SetMaximized { toplevel: ObjectId },
    UnsetMaximized { toplevel: ObjectId },
    SetFullscreen { toplevel: ObjectId, output: Option<ObjectId> },
    UnsetFullscreen { toplevel: ObjectId },
    SetMinimized { toplevel: ObjectId },
    Move { toplevel: ObjectId, seat: ObjectId, serial: Serial },
    Resize { toplevel: ObjectId, seat: ObjectId, serial: Serial, edge: ResizeEdge },
    DestroyToplevel { toplevel: ObjectId },

    // xdg_popup
    Grab { popup: ObjectId, seat: ObjectId, serial: Serial },
    DestroyPopup { popup: ObjectId },

    // xdg_positioner
    SetSize { positioner: ObjectId, size: Size },
    SetAnchorRect { positioner: ObjectId, rect: Rect },
    SetAnchor { positioner: ObjectId, anchor: Anchor },
    SetGravity { positioner: ObjectId, gravity: Gravity },
    DestroyPositioner { positioner: ObjectId },
}

/// Wire sink for the core
///
/// Implementations own the real proxies (or record requests in tests) and
/// keep their own interior mutability; everything runs on the event loop
/// thread.
pub trait Transport {
    /// Reserve the id for a new object. The object exists once the request
    /// carrying the id has been sent.
    fn allocate(&self, interface: Interface) -> ObjectId;

    /// Queue a request. Fire-and-forget.
    fn send(&self, request: Request);
}

/// `xdg_wm_base` events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WmBaseEvent {
    Ping { serial: Serial },
}

/// `xdg_surface` events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Configure { serial: Serial },
}

/// `xdg_toplevel` events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToplevelEvent {
    /// `states` holds the raw state codes of the configure
    Configure { width: i32, height: i32, states: Vec<u32> },
    Close,
}

/// `xdg_popup` events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent {
    Configure { x: i32, y: i32, width: i32, height: i32 },
    PopupDone,
}

/// Any event addressed to one shell surface or its role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Surface(SurfaceEvent),
    Toplevel(ToplevelEvent),
    Popup(PopupEvent),
}

impl From<SurfaceEvent> for ShellEvent {
    fn from(event: SurfaceEvent) -> Self {
        ShellEvent::Surface(event)
    }
}

impl From<ToplevelEvent> for ShellEvent {
    fn from(event: ToplevelEvent) -> Self {
        ShellEvent::Toplevel(event)
    }
}

impl From<PopupEvent> for ShellEvent {
    fn from(event: PopupEvent) -> Self {
        ShellEvent::Popup(event)
    }
}
