//! Popup placement
//!
//! The anchor rectangle is a 1x1 rect at the popup's top-left corner,
//! expressed relative to the parent's content area. The popup hangs down and
//! to the right of that point.

use crate::connection::ShellConnection;
use crate::geometry::{Margins, Rect, Size};
use crate::protocol::{Anchor, Gravity, ObjectId, Request};

/// Positioner parameters for one popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub anchor_rect: Rect,
    pub anchor: Anchor,
    pub gravity: Gravity,
    pub size: Size,
}

impl Placement {
    /// Place a popup at its current absolute position relative to `parent`.
    ///
    /// Both geometries are absolute. When the parent is decorated its content
    /// starts after the left/top margins, so those are added back.
    pub fn for_popup(popup: Rect, parent: Rect, parent_decoration: Option<Margins>) -> Self {
        let mut offset = popup.top_left() - parent.top_left();
        if let Some(margins) = parent_decoration {
            offset.x += margins.left;
            offset.y += margins.top;
        }

        Self {
            anchor_rect: Rect::new(offset.x, offset.y, 1, 1),
            anchor: Anchor::TopLeft,
            gravity: Gravity::BottomRight,
            size: popup.size(),
        }
    }
}

/// A live `xdg_positioner`, consumed by popup creation
pub(crate) struct Positioner {
    object: ObjectId,
}

impl Positioner {
    pub(crate) fn create(connection: &ShellConnection, placement: &Placement) -> Self {
        let object = connection.create_positioner();
        connection.send(Request::SetAnchorRect {
            positioner: object,
            rect: placement.anchor_rect,
        });
        connection.send(Request::SetAnchor {
            positioner: object,
            anchor: placement.anchor,
        });
        connection.send(Request::SetGravity {
            positioner: object,
            gravity: placement.gravity,
        });
        connection.send(Request::SetSize {
            positioner: object,
            size: placement.size,
        });
        Self { object }
    }

    pub(crate) fn object(&self) -> ObjectId {
        self.object
    }

    pub(crate) fn destroy(self, connection: &ShellConnection) {
        connection.send(Request::DestroyPositioner {
            positioner: self.object,
        });
    }
}
