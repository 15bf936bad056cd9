//! Window model for the demo client
//!
//! Holds only what the shell core asks about; drawing lives in `client`.

use std::cell::Cell;
use std::cmp::min;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use xdg_shell::geometry::{Margins, Rect, Region, Size};
use xdg_shell::protocol::ObjectId;
use xdg_shell::window::{DisplayHandler, InputContext, ShellHandle, ShellWindow, WindowId};
use xdg_shell::WindowStates;

pub const DEFAULT_SIZE: Size = Size::new(320, 240);

/// What the surface needs after a dispatch round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Idle,
    /// Commit so a sent ack takes effect
    Commit,
    /// Draw and commit a new buffer
    Redraw,
}

pub struct DemoWindow {
    id: WindowId,
    surface: ObjectId,
    size: Size,
    states: WindowStates,
    shell_handle: Option<ShellHandle>,
    pub needs_apply: bool,
    needs_redraw: bool,
    needs_commit: bool,
    pub closed: bool,
}

impl DemoWindow {
    pub fn new(id: WindowId, surface: ObjectId) -> Self {
        Self {
            id,
            surface,
            size: DEFAULT_SIZE,
            states: WindowStates::empty(),
            shell_handle: None,
            needs_apply: false,
            needs_redraw: false,
            needs_commit: false,
            closed: false,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_shell_handle(&mut self, handle: ShellHandle) {
        self.shell_handle = Some(handle);
    }

    /// A configure was acked; the next frame must at least commit
    pub fn configure_acked(&mut self) {
        self.needs_commit = true;
    }

    /// Take the pending frame work. A redraw also covers any pending commit.
    pub fn next_frame(&mut self, can_draw: bool) -> Frame {
        if self.needs_redraw && can_draw {
            self.needs_redraw = false;
            self.needs_commit = false;
            Frame::Redraw
        } else if self.needs_commit {
            self.needs_commit = false;
            Frame::Commit
        } else {
            Frame::Idle
        }
    }
}

impl ShellWindow for DemoWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn surface(&self) -> ObjectId {
        self.surface
    }

    fn geometry(&self) -> Rect {
        Rect::new(0, 0, self.size.width, self.size.height)
    }

    fn frame_geometry(&self) -> Rect {
        self.geometry()
    }

    fn window_states(&self) -> WindowStates {
        self.states
    }

    fn resize_from_apply_configure(&mut self, size: Size) {
        if !size.is_empty() && size != self.size {
            tracing::info!(width = size.width, height = size.height, "resizing");
            self.size = size;
            self.needs_redraw = true;
        }
    }

    fn handle_window_states_changed(&mut self, states: WindowStates) {
        tracing::info!(?states, "window states changed");
        self.states = states;
    }

    fn apply_configure_when_possible(&mut self) {
        self.needs_apply = true;
    }

    fn decoration_margins(&self) -> Option<Margins> {
        None
    }

    fn handle_expose(&mut self, _region: Region) {
        self.needs_redraw = true;
    }

    fn close(&mut self) {
        tracing::info!(window = %self.id, "close requested");
        self.closed = true;
    }

    fn shell_handle(&self) -> Option<ShellHandle> {
        self.shell_handle
    }
}

/// Tracks the last input serial and logs focus changes
#[derive(Default)]
pub struct DemoDisplay {
    last_input: Cell<Option<InputContext>>,
}

impl DemoDisplay {
    pub fn record_input(&self, input: InputContext) {
        self.last_input.set(Some(input));
    }
}

impl DisplayHandler for DemoDisplay {
    fn window_activated(&self, window: WindowId) {
        tracing::info!(%window, "activated");
    }

    fn window_deactivated(&self, window: WindowId) {
        tracing::info!(%window, "deactivated");
    }

    fn last_input(&self) -> Option<InputContext> {
        self.last_input.get()
    }
}

/// Draw an ARGB8888 color gradient of `size` into the temp file.
pub fn draw(tmp: &mut File, size: Size) -> io::Result<()> {
    let width = size.width.max(1) as u32;
    let height = size.height.max(1) as u32;
    let mut buf = BufWriter::new(tmp);
    for y in 0..height {
        for x in 0..width {
            let r = min(((width - x) * 0xFF) / width, ((height - y) * 0xFF) / height);
            let g = min((x * 0xFF) / width, ((height - y) * 0xFF) / height);
            let b = min(((width - x) * 0xFF) / width, (y * 0xFF) / height);
            // ARGB8888 in little-endian memory: B G R A
            buf.write_all(&[b as u8, g as u8, r as u8, 0xFF])?;
        }
    }
    buf.flush()
}
