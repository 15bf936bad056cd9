//! `Transport` over real wayland-client proxies
//!
//! The shell core names objects by [`ObjectId`]; this table maps those ids to
//! the proxies wayland-client hands out. Objects the core creates get their
//! id as user data so their events can be routed back.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use wayland_client::protocol::{wl_seat::WlSeat, wl_surface::WlSurface};
use wayland_client::QueueHandle;
use wayland_protocols::xdg::shell::client::{
    xdg_popup::XdgPopup, xdg_positioner, xdg_positioner::XdgPositioner, xdg_surface::XdgSurface,
    xdg_toplevel, xdg_toplevel::XdgToplevel, xdg_wm_base::XdgWmBase,
};
use xdg_shell::protocol::{Anchor, Gravity, Interface, ObjectId, Request, ResizeEdge, Transport};

use crate::client::State;

/// A proxy known to the transport
#[derive(Debug, Clone)]
pub enum Proxy {
    WmBase(XdgWmBase),
    XdgSurface(XdgSurface),
    Toplevel(XdgToplevel),
    Popup(XdgPopup),
    Positioner(XdgPositioner),
    Surface(WlSurface),
    Seat(WlSeat),
}

trait FromProxy: Sized {
    const KIND: &'static str;

    fn from_proxy(proxy: &Proxy) -> Option<Self>;
}

macro_rules! from_proxy {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl FromProxy for $ty {
            const KIND: &'static str = $kind;

            fn from_proxy(proxy: &Proxy) -> Option<Self> {
                match proxy {
                    Proxy::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }
    };
}

from_proxy!(XdgWmBase, WmBase, "xdg_wm_base");
from_proxy!(XdgSurface, XdgSurface, "xdg_surface");
from_proxy!(XdgToplevel, Toplevel, "xdg_toplevel");
from_proxy!(XdgPopup, Popup, "xdg_popup");
from_proxy!(XdgPositioner, Positioner, "xdg_positioner");
from_proxy!(WlSurface, Surface, "wl_surface");
from_proxy!(WlSeat, Seat, "wl_seat");

pub struct WaylandTransport {
    qh: QueueHandle<State>,
    next_id: Cell<u32>,
    proxies: RefCell<HashMap<ObjectId, Proxy>>,
}

impl WaylandTransport {
    pub fn new(qh: QueueHandle<State>) -> Self {
        Self {
            qh,
            next_id: Cell::new(0),
            proxies: RefCell::new(HashMap::new()),
        }
    }

    /// Give an object created outside the shell core an id
    pub fn register(&self, proxy: Proxy) -> ObjectId {
        let id = self.next();
        tracing::debug!(%id, ?proxy, "registered object");
        self.proxies.borrow_mut().insert(id, proxy);
        id
    }

    fn next(&self) -> ObjectId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        ObjectId(id)
    }

    fn get<T: FromProxy>(&self, id: ObjectId) -> Option<T> {
        let found = self.proxies.borrow().get(&id).and_then(T::from_proxy);
        if found.is_none() {
            tracing::warn!(%id, kind = T::KIND, "no such object, dropping request");
        }
        found
    }

    fn insert(&self, id: ObjectId, proxy: Proxy) {
        self.proxies.borrow_mut().insert(id, proxy);
    }

    fn remove(&self, id: ObjectId) {
        self.proxies.borrow_mut().remove(&id);
    }

    fn dispatch(&self, request: Request) -> Option<()> {
        let qh = &self.qh;
        match request {
            Request::Pong { wm_base, serial } => {
                self.get::<XdgWmBase>(wm_base)?.pong(serial);
            }
            Request::CreatePositioner { wm_base, id } => {
                let positioner = self.get::<XdgWmBase>(wm_base)?.create_positioner(qh, ());
                self.insert(id, Proxy::Positioner(positioner));
            }
            Request::GetXdgSurface { wm_base, id, surface } => {
                let surface = self.get::<WlSurface>(surface)?;
                let xdg_surface = self.get::<XdgWmBase>(wm_base)?.get_xdg_surface(&surface, qh, id);
                self.insert(id, Proxy::XdgSurface(xdg_surface));
            }
            Request::DestroyWmBase { wm_base } => {
                self.get::<XdgWmBase>(wm_base)?.destroy();
                self.remove(wm_base);
            }

            Request::GetToplevel { xdg_surface, id } => {
                let toplevel = self.get::<XdgSurface>(xdg_surface)?.get_toplevel(qh, id);
                self.insert(id, Proxy::Toplevel(toplevel));
            }
            Request::GetPopup { xdg_surface, id, parent, positioner } => {
                let parent = self.get::<XdgSurface>(parent)?;
                let positioner = self.get::<XdgPositioner>(positioner)?;
                let popup = self
                    .get::<XdgSurface>(xdg_surface)?
                    .get_popup(Some(&parent), &positioner, qh, id);
                self.insert(id, Proxy::Popup(popup));
            }
            Request::AckConfigure { xdg_surface, serial } => {
                self.get::<XdgSurface>(xdg_surface)?.ack_configure(serial);
            }
            Request::DestroyXdgSurface { xdg_surface } => {
                self.get::<XdgSurface>(xdg_surface)?.destroy();
                self.remove(xdg_surface);
            }

            Request::SetTitle { toplevel, title } => {
                self.get::<XdgToplevel>(toplevel)?.set_title(title);
            }
            Request::SetAppId { toplevel, app_id } => {
                self.get::<XdgToplevel>(toplevel)?.set_app_id(app_id);
            }
            Request::SetParent { toplevel, parent } => {
                let parent = match parent {
                    Some(parent) => Some(self.get::<XdgToplevel>(parent)?),
                    None => None,
                };
                self.get::<XdgToplevel>(toplevel)?.set_parent(parent.as_ref());
            }
            Request::SetMaximized { toplevel } => {
                self.get::<XdgToplevel>(toplevel)?.set_maximized();
            }
            Request::UnsetMaximized { toplevel } => {
                self.get::<XdgToplevel>(toplevel)?.unset_maximized();
            }
            Request::SetFullscreen { toplevel, output } => {
                if let Some(output) = output {
                    tracing::debug!(%output, "outputs are not tracked, letting the compositor pick");
                }
                self.get::<XdgToplevel>(toplevel)?.set_fullscreen(None);
            }
            Request::UnsetFullscreen { toplevel } => {
                self.get::<XdgToplevel>(toplevel)?.unset_fullscreen();
            }
            Request::SetMinimized { toplevel } => {
                self.get::<XdgToplevel>(toplevel)?.set_minimized();
            }
            Request::Move { toplevel, seat, serial } => {
                let seat = self.get::<WlSeat>(seat)?;
                self.get::<XdgToplevel>(toplevel)?._move(&seat, serial);
            }
            Request::Resize { toplevel, seat, serial, edge } => {
                let seat = self.get::<WlSeat>(seat)?;
                self.get::<XdgToplevel>(toplevel)?
                    .resize(&seat, serial, resize_edge(edge));
            }
            Request::DestroyToplevel { toplevel } => {
                self.get::<XdgToplevel>(toplevel)?.destroy();
                self.remove(toplevel);
            }

            Request::Grab { popup, seat, serial } => {
                let seat = self.get::<WlSeat>(seat)?;
                self.get::<XdgPopup>(popup)?.grab(&seat, serial);
            }
            Request::DestroyPopup { popup } => {
                self.get::<XdgPopup>(popup)?.destroy();
                self.remove(popup);
            }

            Request::SetSize { positioner, size } => {
                self.get::<XdgPositioner>(positioner)?
                    .set_size(size.width, size.height);
            }
            Request::SetAnchorRect { positioner, rect } => {
                self.get::<XdgPositioner>(positioner)?
                    .set_anchor_rect(rect.x, rect.y, rect.width, rect.height);
            }
            Request::SetAnchor { positioner, anchor: value } => {
                self.get::<XdgPositioner>(positioner)?.set_anchor(anchor(value));
            }
            Request::SetGravity { positioner, gravity: value } => {
                self.get::<XdgPositioner>(positioner)?.set_gravity(gravity(value));
            }
            Request::DestroyPositioner { positioner } => {
                self.get::<XdgPositioner>(positioner)?.destroy();
                self.remove(positioner);
            }
        }
        Some(())
    }
}

impl Transport for WaylandTransport {
    fn allocate(&self, interface: Interface) -> ObjectId {
        let id = self.next();
        tracing::trace!(%id, interface = interface.name(), "allocated");
        id
    }

    fn send(&self, request: Request) {
        tracing::trace!(?request, "sending");
        // Missing objects are logged in `get`
        let _ = self.dispatch(request);
    }
}

fn resize_edge(edge: ResizeEdge) -> xdg_toplevel::ResizeEdge {
    use xdg_toplevel::ResizeEdge as Wire;
    match edge {
        ResizeEdge::None => Wire::None,
        ResizeEdge::Top => Wire::Top,
        ResizeEdge::Bottom => Wire::Bottom,
        ResizeEdge::Left => Wire::Left,
        ResizeEdge::TopLeft => Wire::TopLeft,
        ResizeEdge::BottomLeft => Wire::BottomLeft,
        ResizeEdge::Right => Wire::Right,
        ResizeEdge::TopRight => Wire::TopRight,
        ResizeEdge::BottomRight => Wire::BottomRight,
    }
}

fn anchor(anchor: Anchor) -> xdg_positioner::Anchor {
    use xdg_positioner::Anchor as Wire;
    match anchor {
        Anchor::None => Wire::None,
        Anchor::Top => Wire::Top,
        Anchor::Bottom => Wire::Bottom,
        Anchor::Left => Wire::Left,
        Anchor::Right => Wire::Right,
        Anchor::TopLeft => Wire::TopLeft,
        Anchor::BottomLeft => Wire::BottomLeft,
        Anchor::TopRight => Wire::TopRight,
        Anchor::BottomRight => Wire::BottomRight,
    }
}

fn gravity(gravity: Gravity) -> xdg_positioner::Gravity {
    use xdg_positioner::Gravity as Wire;
    match gravity {
        Gravity::None => Wire::None,
        Gravity::Top => Wire::Top,
        Gravity::Bottom => Wire::Bottom,
        Gravity::Left => Wire::Left,
        Gravity::Right => Wire::Right,
        Gravity::TopLeft => Wire::TopLeft,
        Gravity::BottomLeft => Wire::BottomLeft,
        Gravity::TopRight => Wire::TopRight,
        Gravity::BottomRight => Wire::BottomRight,
    }
}
