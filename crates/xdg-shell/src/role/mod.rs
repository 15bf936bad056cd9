//! Surface roles
//!
//! A surface carries at most one role for its whole life, so the role is a
//! plain sum type held in an `Option` by the shell surface.

mod popup;
mod toplevel;

pub use popup::Popup;
pub use toplevel::{Toplevel, ToplevelState};

use crate::connection::ShellConnection;
use crate::protocol::ObjectId;
use crate::window::{DisplayHandler, ShellWindow, WindowId};

pub enum Role {
    Toplevel(Toplevel),
    Popup(Popup),
}

impl Role {
    pub fn object(&self) -> ObjectId {
        match self {
            Role::Toplevel(toplevel) => toplevel.object(),
            Role::Popup(popup) => popup.object(),
        }
    }

    pub fn as_toplevel(&self) -> Option<&Toplevel> {
        match self {
            Role::Toplevel(toplevel) => Some(toplevel),
            Role::Popup(_) => None,
        }
    }

    pub fn as_popup(&self) -> Option<&Popup> {
        match self {
            Role::Popup(popup) => Some(popup),
            Role::Toplevel(_) => None,
        }
    }

    pub(crate) fn apply_configure(
        &mut self,
        window: &mut dyn ShellWindow,
        display: &dyn DisplayHandler,
    ) {
        match self {
            Role::Toplevel(toplevel) => toplevel.apply_configure(window, display),
            // Popup configures only carry geometry the window already has
            Role::Popup(_) => {}
        }
    }

    pub(crate) fn destroy(
        self,
        connection: Option<&ShellConnection>,
        display: &dyn DisplayHandler,
        window: WindowId,
    ) {
        match self {
            Role::Toplevel(toplevel) => toplevel.destroy(connection, display, window),
            Role::Popup(popup) => popup.destroy(connection),
        }
    }
}
