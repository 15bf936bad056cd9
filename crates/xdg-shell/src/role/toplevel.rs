//! `xdg_toplevel` role
//!
//! Configures arrive as complete restatements (size + states) and are held
//! as `pending` until the window layer applies them. `applied` is what the
//! window was last told; requests are diffed against it.

use crate::connection::ShellConnection;
use crate::geometry::Size;
use crate::protocol::{Interface, ObjectId, Request, ToplevelEvent};
use crate::states::WindowStates;
use crate::window::{DisplayHandler, ShellWindow, WindowId};

/// One configure's worth of toplevel state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToplevelState {
    pub size: Size,
    pub states: WindowStates,
}

pub struct Toplevel {
    object: ObjectId,
    pending: ToplevelState,
    applied: ToplevelState,
    /// Last size while neither maximized nor fullscreen
    normal_size: Size,
}

impl Toplevel {
    /// Create the role object and re-assert the window's current states, so
    /// a late role starts where the application already is.
    pub(crate) fn new(
        connection: &ShellConnection,
        xdg_surface: ObjectId,
        window: &mut dyn ShellWindow,
    ) -> Self {
        let object = connection.allocate(Interface::Toplevel);
        connection.send(Request::GetToplevel {
            xdg_surface,
            id: object,
        });

        let toplevel = Self {
            object,
            pending: ToplevelState::default(),
            applied: ToplevelState::default(),
            normal_size: Size::default(),
        };
        let states = window.window_states();
        toplevel.request_window_states(connection, window, states);
        toplevel
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn pending(&self) -> ToplevelState {
        self.pending
    }

    pub fn applied(&self) -> ToplevelState {
        self.applied
    }

    pub fn normal_size(&self) -> Size {
        self.normal_size
    }

    pub(crate) fn handle_event(&mut self, event: ToplevelEvent, window: &mut dyn ShellWindow) {
        match event {
            ToplevelEvent::Configure {
                width,
                height,
                states,
            } => {
                self.pending = ToplevelState {
                    size: Size::new(width, height),
                    states: WindowStates::from_codes(&states),
                };
                tracing::trace!(
                    toplevel = %self.object,
                    width,
                    height,
                    states = ?self.pending.states,
                    "toplevel configure"
                );
            }
            ToplevelEvent::Close => {
                tracing::debug!(toplevel = %self.object, window = %window.id(), "compositor asked to close");
                window.close();
            }
        }
    }

    pub(crate) fn apply_configure(
        &mut self,
        window: &mut dyn ShellWindow,
        display: &dyn DisplayHandler,
    ) {
        let sized_by_compositor = WindowStates::MAXIMIZED | WindowStates::FULLSCREEN;
        if !self.applied.states.intersects(sized_by_compositor) {
            self.normal_size = window.frame_geometry().size();
        }

        if self.pending.size.is_empty() && !self.normal_size.is_empty() {
            self.pending.size = self.normal_size;
        }

        let was_active = self.applied.states.contains(WindowStates::ACTIVE);
        let is_active = self.pending.states.contains(WindowStates::ACTIVE);
        match (was_active, is_active) {
            (false, true) => display.window_activated(window.id()),
            (true, false) => display.window_deactivated(window.id()),
            _ => {}
        }

        // Activation is tracked by the display, not in the window's states
        window.handle_window_states_changed(self.pending.states - WindowStates::ACTIVE);
        window.resize_from_apply_configure(self.pending.size);
        self.applied = self.pending;

        tracing::debug!(
            toplevel = %self.object,
            window = %window.id(),
            size = ?self.applied.size,
            states = ?self.applied.states,
            "applied toplevel configure"
        );
    }

    /// Ask the compositor for `states`, sending only what differs from the
    /// applied states. Minimize is always sent since it is never reported back.
    pub(crate) fn request_window_states(
        &self,
        connection: &ShellConnection,
        window: &mut dyn ShellWindow,
        states: WindowStates,
    ) {
        let changed = self.applied.states ^ states;
        let toplevel = self.object;

        if changed.contains(WindowStates::MAXIMIZED) {
            if states.contains(WindowStates::MAXIMIZED) {
                connection.send(Request::SetMaximized { toplevel });
            } else {
                connection.send(Request::UnsetMaximized { toplevel });
            }
        }

        if changed.contains(WindowStates::FULLSCREEN) {
            if states.contains(WindowStates::FULLSCREEN) {
                connection.send(Request::SetFullscreen {
                    toplevel,
                    output: None,
                });
            } else {
                connection.send(Request::UnsetFullscreen { toplevel });
            }
        }

        if states.contains(WindowStates::MINIMIZED) {
            connection.send(Request::SetMinimized { toplevel });
            if connection.config().reflect_minimized {
                window.handle_window_states_changed(states - WindowStates::MINIMIZED);
            }
        }

        tracing::debug!(toplevel = %self.object, requested = ?states, changed = ?changed, "requested window states");
    }

    pub(crate) fn set_title(&self, connection: &ShellConnection, title: &str) {
        connection.send(Request::SetTitle {
            toplevel: self.object,
            title: title.to_owned(),
        });
    }

    pub(crate) fn set_app_id(&self, connection: &ShellConnection, app_id: &str) {
        connection.send(Request::SetAppId {
            toplevel: self.object,
            app_id: app_id.to_owned(),
        });
    }

    pub(crate) fn set_parent(&self, connection: &ShellConnection, parent: Option<ObjectId>) {
        connection.send(Request::SetParent {
            toplevel: self.object,
            parent,
        });
    }

    /// Release the role. An active toplevel deactivates first so the display
    /// never tracks a destroyed window as active.
    pub(crate) fn destroy(
        self,
        connection: Option<&ShellConnection>,
        display: &dyn DisplayHandler,
        window: WindowId,
    ) {
        if self.applied.states.contains(WindowStates::ACTIVE) {
            display.window_deactivated(window);
        }
        if let Some(connection) = connection {
            connection.send(Request::DestroyToplevel {
                toplevel: self.object,
            });
        }
    }
}
