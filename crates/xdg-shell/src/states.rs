//! Window state flags and the toplevel configure state codes

use bitflags::bitflags;

bitflags! {
    /// Window states shared between the window layer and the toplevel role.
    ///
    /// `MINIMIZED` is never reported back by the compositor, so it only ever
    /// travels client -> compositor.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct WindowStates: u8 {
        const ACTIVE     = 0b0001;
        const MAXIMIZED  = 0b0010;
        const FULLSCREEN = 0b0100;
        const MINIMIZED  = 0b1000;
    }
}

/// `xdg_toplevel.state` wire values
pub mod code {
    pub const MAXIMIZED: u32 = 1;
    pub const FULLSCREEN: u32 = 2;
    pub const RESIZING: u32 = 3;
    pub const ACTIVATED: u32 = 4;
    pub const TILED_LEFT: u32 = 5;
    pub const TILED_RIGHT: u32 = 6;
    pub const TILED_TOP: u32 = 7;
    pub const TILED_BOTTOM: u32 = 8;
}

impl WindowStates {
    /// Map a single configure state code. Codes outside the set this client
    /// understands (resizing, tiling, anything newer) map to `None`.
    pub fn from_code(code: u32) -> Option<WindowStates> {
        match code {
            code::ACTIVATED => Some(WindowStates::ACTIVE),
            code::MAXIMIZED => Some(WindowStates::MAXIMIZED),
            code::FULLSCREEN => Some(WindowStates::FULLSCREEN),
            _ => None,
        }
    }

    /// Decode the state array of a toplevel configure into a complete set.
    pub fn from_codes(codes: &[u32]) -> WindowStates {
        codes
            .iter()
            .filter_map(|&code| WindowStates::from_code(code))
            .fold(WindowStates::empty(), |acc, state| acc | state)
    }

    /// Decode the raw `wl_array` payload (native-endian `u32`s).
    pub fn from_wire(bytes: &[u8]) -> WindowStates {
        WindowStates::from_codes(&codes_from_wire(bytes))
    }
}

/// Split a `wl_array` of state codes into its elements.
///
/// A trailing partial element is ignored.
pub fn codes_from_wire(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
