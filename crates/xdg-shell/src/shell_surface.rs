//! Shell surface: role ownership and the configure/ack handshake
//!
//! Lifecycle: `Unset` -> `RoleAssigned` -> `AwaitingConfigure` -> `Configured`,
//! going back to `AwaitingConfigure` on every compositor configure. The
//! window layer owns the shell surface and passes itself into each call
//! that needs it.

use std::rc::{Rc, Weak};

use crate::connection::ShellConnection;
use crate::error::ShellError;
use crate::geometry::Region;
use crate::positioner::{Placement, Positioner};
use crate::protocol::{ObjectId, Request, ResizeEdge, Serial, ShellEvent, SurfaceEvent};
use crate::role::{Popup, Role, Toplevel};
use crate::states::WindowStates;
use crate::window::{
    DisplayHandler, InputContext, ShellHandle, ShellWindow, WindowId, WindowType,
};

/// Where a shell surface is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePhase {
    Unset,
    RoleAssigned,
    AwaitingConfigure,
    Configured,
}

/// Outcome of [`ShellSurface::handle_expose`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposeDisposition {
    /// Buffered until the first configure; the caller must not draw yet
    Suppressed,
    /// Handle the expose normally
    Passthrough,
}

pub struct ShellSurface {
    connection: Weak<ShellConnection>,
    display: Rc<dyn DisplayHandler>,
    window: WindowId,
    object: ObjectId,
    role: Option<Role>,
    pending_serial: Option<Serial>,
    configured: bool,
    expose_region: Region,
}

impl ShellSurface {
    pub(crate) fn new(
        connection: Weak<ShellConnection>,
        display: Rc<dyn DisplayHandler>,
        window: WindowId,
        object: ObjectId,
    ) -> Self {
        Self {
            connection,
            display,
            window,
            object,
            role: None,
            pending_serial: None,
            configured: false,
            expose_region: Region::new(),
        }
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    pub fn toplevel(&self) -> Option<&Toplevel> {
        self.role.as_ref().and_then(Role::as_toplevel)
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.role.as_ref().and_then(Role::as_popup)
    }

    pub fn pending_serial(&self) -> Option<Serial> {
        self.pending_serial
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn phase(&self) -> SurfacePhase {
        match (&self.role, self.pending_serial, self.configured) {
            (None, _, _) => SurfacePhase::Unset,
            (Some(_), Some(_), _) => SurfacePhase::AwaitingConfigure,
            (Some(_), None, true) => SurfacePhase::Configured,
            (Some(_), None, false) => SurfacePhase::RoleAssigned,
        }
    }

    /// Handle for the window layer to hand out when this surface is a parent
    pub fn handle(&self) -> ShellHandle {
        ShellHandle {
            xdg_surface: self.object,
            toplevel: self.toplevel().map(Toplevel::object),
        }
    }

    fn connection(&self) -> Result<Rc<ShellConnection>, ShellError> {
        self.connection.upgrade().ok_or(ShellError::ConnectionGone)
    }

    fn ensure_no_role(&self) -> Result<(), ShellError> {
        if self.role.is_some() {
            tracing::error!(xdg_surface = %self.object, "surface already has a role");
            return Err(ShellError::RoleAlreadyAssigned(self.object));
        }
        Ok(())
    }

    pub fn set_toplevel(&mut self, window: &mut dyn ShellWindow) -> Result<(), ShellError> {
        self.ensure_no_role()?;
        let connection = self.connection()?;

        let toplevel = Toplevel::new(&connection, self.object, window);
        tracing::info!(
            window = %self.window,
            xdg_surface = %self.object,
            toplevel = %toplevel.object(),
            "assigned toplevel role"
        );
        self.role = Some(Role::Toplevel(toplevel));
        Ok(())
    }

    /// Attach the popup role, placed at the window's current position
    /// relative to `parent`.
    ///
    /// `input` must come from the event that opened the popup; a grab with
    /// any other serial is refused by the compositor.
    pub fn set_popup(
        &mut self,
        window: &dyn ShellWindow,
        parent: &dyn ShellWindow,
        input: InputContext,
        grab: bool,
    ) -> Result<(), ShellError> {
        self.ensure_no_role()?;
        let parent_handle = parent
            .shell_handle()
            .ok_or(ShellError::ParentNotShellSurface)?;
        let connection = self.connection()?;

        let placement = Placement::for_popup(
            window.geometry(),
            parent.geometry(),
            parent.decoration_margins(),
        );
        let positioner = Positioner::create(&connection, &placement);
        let popup = Popup::new(
            &connection,
            self.object,
            parent_handle.xdg_surface,
            &positioner,
        );
        positioner.destroy(&connection);

        if grab {
            popup.grab(&connection, input);
        }

        tracing::info!(
            window = %self.window,
            parent = %parent.id(),
            popup = %popup.object(),
            anchor_rect = ?placement.anchor_rect,
            grab,
            "assigned popup role"
        );
        self.role = Some(Role::Popup(popup));
        Ok(())
    }

    /// Pick the role for a window type.
    ///
    /// Popups and tooltips need a transient parent and a known last input;
    /// without either they fall back to a toplevel. A transient parent of a
    /// toplevel is linked only if the parent is a toplevel itself.
    pub fn set_type(
        &mut self,
        window: &mut dyn ShellWindow,
        window_type: WindowType,
        transient_parent: Option<&dyn ShellWindow>,
    ) -> Result<(), ShellError> {
        if let (Some(grab), Some(parent)) = (window_type.popup_grab(), transient_parent) {
            if let Some(input) = self.display.last_input() {
                return self.set_popup(window, parent, input, grab);
            }
            tracing::debug!(window = %self.window, "no input seen yet, using toplevel for popup");
        }

        self.set_toplevel(window)?;

        if let Some(parent) = transient_parent {
            match parent.shell_handle().and_then(|handle| handle.toplevel) {
                Some(parent_toplevel) => {
                    let connection = self.connection()?;
                    if let Some(toplevel) = self.toplevel() {
                        toplevel.set_parent(&connection, Some(parent_toplevel));
                    }
                }
                None => {
                    tracing::debug!(
                        window = %self.window,
                        parent = %parent.id(),
                        "transient parent has no toplevel, not linking"
                    );
                }
            }
        }
        Ok(())
    }

    pub fn set_title(&self, title: &str) {
        if let (Some(toplevel), Ok(connection)) = (self.toplevel(), self.connection()) {
            toplevel.set_title(&connection, title);
        }
    }

    pub fn set_app_id(&self, app_id: &str) {
        if let (Some(toplevel), Ok(connection)) = (self.toplevel(), self.connection()) {
            toplevel.set_app_id(&connection, app_id);
        }
    }

    /// Start an interactive resize. Callers check for a toplevel first.
    pub fn resize(&self, input: InputContext, edge: ResizeEdge) -> Result<(), ShellError> {
        let Some(toplevel) = self.toplevel() else {
            tracing::error!(xdg_surface = %self.object, "resize without toplevel role");
            return Err(ShellError::NoToplevel(self.object));
        };
        let connection = self.connection()?;
        connection.send(Request::Resize {
            toplevel: toplevel.object(),
            seat: input.seat,
            serial: input.serial,
            edge,
        });
        Ok(())
    }

    /// Start an interactive move. Returns false when there is no toplevel
    /// to move.
    pub fn move_(&self, input: InputContext) -> bool {
        let (Some(toplevel), Ok(connection)) = (self.toplevel(), self.connection()) else {
            return false;
        };
        connection.send(Request::Move {
            toplevel: toplevel.object(),
            seat: input.seat,
            serial: input.serial,
        });
        true
    }

    pub fn request_window_states(&self, window: &mut dyn ShellWindow, states: WindowStates) {
        let Some(toplevel) = self.toplevel() else {
            tracing::warn!(window = %self.window, ?states, "non-toplevel surfaces can't request window states");
            return;
        };
        match self.connection() {
            Ok(connection) => toplevel.request_window_states(&connection, window, states),
            Err(e) => tracing::warn!(window = %self.window, error = %e, "dropping window state request"),
        }
    }

    /// Compositors reject content committed before the first ack, so exposes
    /// are held back until then.
    pub fn handle_expose(&mut self, region: &Region) -> ExposeDisposition {
        if !self.configured && !region.is_empty() {
            self.expose_region = region.clone();
            return ExposeDisposition::Suppressed;
        }
        ExposeDisposition::Passthrough
    }

    /// Apply the pending configure and acknowledge it.
    ///
    /// Call exactly once per configure, after the window has made the layout
    /// changes it wants in the same commit.
    pub fn apply_configure(&mut self, window: &mut dyn ShellWindow) -> Result<(), ShellError> {
        let Some(serial) = self.pending_serial else {
            tracing::error!(xdg_surface = %self.object, "apply_configure without pending configure");
            return Err(ShellError::NoPendingConfigure(self.object));
        };
        let connection = self.connection()?;

        if let Some(role) = self.role.as_mut() {
            role.apply_configure(window, self.display.as_ref());
        }

        self.configured = true;
        connection.send(Request::AckConfigure {
            xdg_surface: self.object,
            serial,
        });
        self.pending_serial = None;

        tracing::debug!(window = %self.window, serial, "acked configure");
        Ok(())
    }

    /// Decorations follow the state about to be committed, not the last one
    pub fn wants_decorations(&self) -> bool {
        self.toplevel()
            .is_some_and(|toplevel| !toplevel.pending().states.contains(WindowStates::FULLSCREEN))
    }

    pub fn handle_event(&mut self, event: ShellEvent, window: &mut dyn ShellWindow) {
        match event {
            ShellEvent::Surface(SurfaceEvent::Configure { serial }) => {
                self.handle_surface_configure(serial, window);
            }
            ShellEvent::Toplevel(event) => match self.role.as_mut() {
                Some(Role::Toplevel(toplevel)) => toplevel.handle_event(event, window),
                _ => tracing::warn!(xdg_surface = %self.object, ?event, "toplevel event without toplevel role"),
            },
            ShellEvent::Popup(event) => match self.role.as_mut() {
                Some(Role::Popup(popup)) => popup.handle_event(event, window),
                _ => tracing::warn!(xdg_surface = %self.object, ?event, "popup event without popup role"),
            },
        }
    }

    fn handle_surface_configure(&mut self, serial: Serial, window: &mut dyn ShellWindow) {
        // Acking the latest configure acknowledges the earlier ones too
        if let Some(previous) = self.pending_serial.replace(serial) {
            tracing::debug!(xdg_surface = %self.object, previous, serial, "superseding unacked configure");
        }
        window.apply_configure_when_possible();

        if !self.expose_region.is_empty() {
            window.handle_expose(std::mem::take(&mut self.expose_region));
        }
    }
}

impl Drop for ShellSurface {
    fn drop(&mut self) {
        let connection = self.connection.upgrade();
        if let Some(role) = self.role.take() {
            role.destroy(connection.as_deref(), self.display.as_ref(), self.window);
        }
        match connection {
            Some(connection) => {
                connection.send(Request::DestroyXdgSurface {
                    xdg_surface: self.object,
                });
                connection.surface_destroyed();
            }
            None => tracing::debug!(xdg_surface = %self.object, "connection gone, nothing to destroy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::protocol::{Interface, ToplevelEvent, Transport};
    use crate::test_util::{FakeDisplay, FakeTransport, FakeWindow};

    fn setup() -> (Rc<FakeTransport>, Rc<FakeDisplay>, Rc<ShellConnection>) {
        let transport = Rc::new(FakeTransport::default());
        let display = Rc::new(FakeDisplay::default());
        let wm_base = transport.allocate(Interface::WmBase);
        let connection = ShellConnection::new(
            transport.clone(),
            display.clone(),
            wm_base,
            1,
            ShellConfig::default(),
        );
        (transport, display, connection)
    }

    #[test]
    fn phases_follow_handshake() {
        let (_transport, _display, connection) = setup();
        let mut window = FakeWindow::new(1);
        let mut surface = connection.create_shell_surface(&window);
        assert_eq!(surface.phase(), SurfacePhase::Unset);

        surface.set_toplevel(&mut window).unwrap();
        assert_eq!(surface.phase(), SurfacePhase::RoleAssigned);

        surface.handle_event(SurfaceEvent::Configure { serial: 10 }.into(), &mut window);
        assert_eq!(surface.phase(), SurfacePhase::AwaitingConfigure);

        surface.apply_configure(&mut window).unwrap();
        assert_eq!(surface.phase(), SurfacePhase::Configured);

        surface.handle_event(SurfaceEvent::Configure { serial: 11 }.into(), &mut window);
        assert_eq!(surface.phase(), SurfacePhase::AwaitingConfigure);
    }

    #[test]
    fn second_role_is_rejected() {
        let (_transport, _display, connection) = setup();
        let mut window = FakeWindow::new(1);
        let mut surface = connection.create_shell_surface(&window);

        surface.set_toplevel(&mut window).unwrap();
        let err = surface.set_toplevel(&mut window).unwrap_err();
        assert_eq!(err, ShellError::RoleAlreadyAssigned(surface.object()));
    }

    #[test]
    fn apply_without_configure_is_error() {
        let (transport, _display, connection) = setup();
        let mut window = FakeWindow::new(1);
        let mut surface = connection.create_shell_surface(&window);
        surface.set_toplevel(&mut window).unwrap();

        let err = surface.apply_configure(&mut window).unwrap_err();
        assert_eq!(err, ShellError::NoPendingConfigure(surface.object()));
        assert!(!transport
            .requests()
            .iter()
            .any(|r| matches!(r, Request::AckConfigure { .. })));
    }

    #[test]
    fn newer_configure_replaces_pending_serial() {
        let (transport, _display, connection) = setup();
        let mut window = FakeWindow::new(1);
        let mut surface = connection.create_shell_surface(&window);
        surface.set_toplevel(&mut window).unwrap();

        surface.handle_event(SurfaceEvent::Configure { serial: 5 }.into(), &mut window);
        surface.handle_event(SurfaceEvent::Configure { serial: 6 }.into(), &mut window);
        surface.apply_configure(&mut window).unwrap();

        let acks: Vec<Serial> = transport
            .requests()
            .iter()
            .filter_map(|r| match r {
                Request::AckConfigure { serial, .. } => Some(*serial),
                _ => None,
            })
            .collect();
        assert_eq!(acks, vec![6]);
    }

    #[test]
    fn toplevel_event_without_role_is_ignored() {
        let (_transport, _display, connection) = setup();
        let mut window = FakeWindow::new(1);
        let mut surface = connection.create_shell_surface(&window);

        surface.handle_event(ToplevelEvent::Close.into(), &mut window);
        assert!(!window.closed);
    }

    #[test]
    fn dead_connection_reports_error() {
        let (_transport, _display, connection) = setup();
        let mut window = FakeWindow::new(1);
        let mut surface = connection.create_shell_surface(&window);
        drop(connection);

        assert_eq!(surface.set_toplevel(&mut window), Err(ShellError::ConnectionGone));
        assert!(!surface.move_(InputContext {
            seat: ObjectId(99),
            serial: 1
        }));
    }
}
