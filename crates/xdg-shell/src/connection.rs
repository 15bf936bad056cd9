//! The bound `xdg_wm_base` global

use std::cell::Cell;
use std::rc::Rc;

use crate::config::ShellConfig;
use crate::protocol::{Interface, ObjectId, Request, Transport, WmBaseEvent};
use crate::shell_surface::ShellSurface;
use crate::window::{DisplayHandler, ShellWindow};

/// One per client connection
///
/// Shared through `Rc`; shell surfaces only keep a `Weak` to it. The
/// `xdg_wm_base` is only destroyed once every surface created from it is gone.
pub struct ShellConnection {
    wm_base: ObjectId,
    version: u32,
    live_surfaces: Cell<usize>,
    config: ShellConfig,
    transport: Rc<dyn Transport>,
    display: Rc<dyn DisplayHandler>,
}

impl ShellConnection {
    /// Wrap an `xdg_wm_base` the registry layer has bound.
    ///
    /// `version` is what the global was bound at, normally
    /// `config.bind_version(advertised)`.
    pub fn new(
        transport: Rc<dyn Transport>,
        display: Rc<dyn DisplayHandler>,
        wm_base: ObjectId,
        version: u32,
        config: ShellConfig,
    ) -> Rc<Self> {
        tracing::info!(%wm_base, version, "bound xdg_wm_base");
        Rc::new(Self {
            wm_base,
            version,
            live_surfaces: Cell::new(0),
            config,
            transport,
            display,
        })
    }

    /// Allocate the `xdg_wm_base` object and bind it at
    /// `min(advertised, config.max_version)`.
    pub fn bind(
        transport: Rc<dyn Transport>,
        display: Rc<dyn DisplayHandler>,
        advertised_version: u32,
        config: ShellConfig,
    ) -> Rc<Self> {
        let wm_base = transport.allocate(Interface::WmBase);
        let version = config.bind_version(advertised_version);
        Self::new(transport, display, wm_base, version, config)
    }

    pub fn wm_base(&self) -> ObjectId {
        self.wm_base
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn display(&self) -> &Rc<dyn DisplayHandler> {
        &self.display
    }

    /// Create the shell surface for a window. Always succeeds.
    pub fn create_shell_surface(self: &Rc<Self>, window: &dyn ShellWindow) -> ShellSurface {
        let id = self.allocate(Interface::XdgSurface);
        self.send(Request::GetXdgSurface {
            wm_base: self.wm_base,
            id,
            surface: window.surface(),
        });
        tracing::debug!(window = %window.id(), xdg_surface = %id, "created xdg_surface");
        self.live_surfaces.set(self.live_surfaces.get() + 1);
        ShellSurface::new(Rc::downgrade(self), Rc::clone(&self.display), window.id(), id)
    }

    /// Shell surfaces created from this connection and not yet destroyed
    pub fn live_surfaces(&self) -> usize {
        self.live_surfaces.get()
    }

    pub fn handle_event(&self, event: WmBaseEvent) {
        match event {
            WmBaseEvent::Ping { serial } => {
                tracing::trace!(serial, "ping");
                self.send(Request::Pong {
                    wm_base: self.wm_base,
                    serial,
                });
            }
        }
    }

    /// Allocate an `xdg_positioner` for popup placement
    pub(crate) fn create_positioner(&self) -> ObjectId {
        let id = self.allocate(Interface::Positioner);
        self.send(Request::CreatePositioner {
            wm_base: self.wm_base,
            id,
        });
        id
    }

    pub(crate) fn surface_destroyed(&self) {
        self.live_surfaces.set(self.live_surfaces.get().saturating_sub(1));
    }

    pub(crate) fn allocate(&self, interface: Interface) -> ObjectId {
        self.transport.allocate(interface)
    }

    pub(crate) fn send(&self, request: Request) {
        self.transport.send(request);
    }
}

impl Drop for ShellConnection {
    fn drop(&mut self) {
        let live = self.live_surfaces.get();
        if live > 0 {
            // Destroying the global under live surfaces is a protocol error
            tracing::error!(
                wm_base = %self.wm_base,
                live,
                "connection dropped with live shell surfaces, leaving xdg_wm_base"
            );
            return;
        }
        self.transport.send(Request::DestroyWmBase {
            wm_base: self.wm_base,
        });
    }
}
