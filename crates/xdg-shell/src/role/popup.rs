//! `xdg_popup` role

use crate::connection::ShellConnection;
use crate::positioner::Positioner;
use crate::protocol::{Interface, ObjectId, PopupEvent, Request};
use crate::window::{InputContext, ShellWindow};

pub struct Popup {
    object: ObjectId,
    parent: ObjectId,
}

impl Popup {
    pub(crate) fn new(
        connection: &ShellConnection,
        xdg_surface: ObjectId,
        parent: ObjectId,
        positioner: &Positioner,
    ) -> Self {
        let object = connection.allocate(Interface::Popup);
        connection.send(Request::GetPopup {
            xdg_surface,
            id: object,
            parent,
            positioner: positioner.object(),
        });
        Self { object, parent }
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// `xdg_surface` of the parent
    pub fn parent(&self) -> ObjectId {
        self.parent
    }

    /// Take an explicit grab. The serial must be that of the input event
    /// that triggered the popup or the compositor dismisses it.
    pub(crate) fn grab(&self, connection: &ShellConnection, input: InputContext) {
        connection.send(Request::Grab {
            popup: self.object,
            seat: input.seat,
            serial: input.serial,
        });
    }

    pub(crate) fn handle_event(&mut self, event: PopupEvent, window: &mut dyn ShellWindow) {
        match event {
            PopupEvent::Configure {
                x,
                y,
                width,
                height,
            } => {
                // The window already has this geometry from creation time
                tracing::trace!(popup = %self.object, x, y, width, height, "popup configure");
            }
            PopupEvent::PopupDone => {
                tracing::debug!(popup = %self.object, window = %window.id(), "popup dismissed");
                window.close();
            }
        }
    }

    pub(crate) fn destroy(self, connection: Option<&ShellConnection>) {
        if let Some(connection) = connection {
            connection.send(Request::DestroyPopup { popup: self.object });
        }
    }
}
