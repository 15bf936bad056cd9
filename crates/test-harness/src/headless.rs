//! Headless client wrapper for testing
//!
//! `TestClient` owns a shell connection over a [`RecordingTransport`] and a
//! set of mock windows with their shell surfaces. Tests call the window-side
//! API and inject compositor events with the `send_*` helpers.

use std::rc::Rc;

use thiserror::Error;
use xdg_shell::geometry::{Rect, Region, Size};
use xdg_shell::protocol::{
    ObjectId, PopupEvent, ResizeEdge, Serial, ShellEvent, SurfaceEvent, ToplevelEvent, WmBaseEvent,
};
use xdg_shell::window::{InputContext, ShellWindow, WindowId, WindowType};
use xdg_shell::{
    ExposeDisposition, ShellConfig, ShellConnection, ShellError, ShellSurface, SurfacePhase,
    WindowStates,
};

use crate::mock::{Journal, MockDisplay, MockWindow, RecordingTransport};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TestError {
    #[error("window {0} has no shell surface")]
    NoShellSurface(usize),

    #[error("shell error: {0}")]
    Shell(#[from] ShellError),
}

/// Snapshot of one window's shell state for assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSnapshot {
    pub phase: SurfacePhase,
    pub pending_serial: Option<Serial>,
    pub configured: bool,
    pub wants_decorations: bool,
    pub pending_states: Option<WindowStates>,
    pub applied_states: Option<WindowStates>,
    pub window_states: WindowStates,
    pub geometry: Rect,
}

/// Handle to a window in tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle {
    /// Index in the client's window list
    pub index: usize,
}

struct ClientWindow {
    window: MockWindow,
    shell: Option<ShellSurface>,
}

/// Test client wrapper
///
/// Windows are declared first so their shell surfaces are torn down while
/// the connection is still alive.
pub struct TestClient {
    windows: Vec<ClientWindow>,
    journal: Journal,
    transport: Rc<RecordingTransport>,
    display: Rc<MockDisplay>,
    connection: Rc<ShellConnection>,
    seat: ObjectId,
    next_serial: Serial,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    pub fn with_config(config: ShellConfig) -> Self {
        let journal = Journal::default();
        let transport = Rc::new(RecordingTransport::new(journal.clone()));
        let display = Rc::new(MockDisplay::new(journal.clone()));
        let connection = ShellConnection::bind(transport.clone(), display.clone(), 1, config);
        let seat = transport.external_object();

        Self {
            windows: Vec::new(),
            journal,
            transport,
            display,
            connection,
            seat,
            next_serial: 100,
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn transport(&self) -> &RecordingTransport {
        &self.transport
    }

    pub fn display(&self) -> &MockDisplay {
        &self.display
    }

    pub fn connection(&self) -> &Rc<ShellConnection> {
        &self.connection
    }

    pub fn seat(&self) -> ObjectId {
        self.seat
    }

    /// Input context on the test seat with the given serial
    pub fn input(&self, serial: Serial) -> InputContext {
        InputContext {
            seat: self.seat,
            serial,
        }
    }

    /// Record `serial` as the most recent input on the test seat
    pub fn simulate_input(&mut self, serial: Serial) {
        self.display.set_last_input(Some(self.input(serial)));
    }

    /// Add a window with a fresh shell surface but no role yet
    pub fn add_window(&mut self, geometry: Rect) -> WindowHandle {
        let index = self.windows.len();
        let surface = self.transport.external_object();
        let window = MockWindow::new(WindowId(index as u64 + 1), surface, geometry);
        let shell = self.connection.create_shell_surface(&window);
        self.windows.push(ClientWindow {
            window,
            shell: Some(shell),
        });
        WindowHandle { index }
    }

    /// Add a window and give it the toplevel role
    pub fn add_toplevel(&mut self, geometry: Rect) -> Result<WindowHandle, TestError> {
        let handle = self.add_window(geometry);
        self.set_toplevel(handle)?;
        Ok(handle)
    }

    pub fn window(&self, handle: WindowHandle) -> &MockWindow {
        &self.windows[handle.index].window
    }

    pub fn window_mut(&mut self, handle: WindowHandle) -> &mut MockWindow {
        &mut self.windows[handle.index].window
    }

    pub fn shell(&self, handle: WindowHandle) -> Option<&ShellSurface> {
        self.windows[handle.index].shell.as_ref()
    }

    fn entry(&mut self, handle: WindowHandle) -> Result<(&mut MockWindow, &mut ShellSurface), TestError> {
        let entry = &mut self.windows[handle.index];
        let shell = entry
            .shell
            .as_mut()
            .ok_or(TestError::NoShellSurface(handle.index))?;
        Ok((&mut entry.window, shell))
    }

    /// Publish the shell handle the way a window layer would after a role change
    fn refresh_handle(&mut self, handle: WindowHandle) {
        let entry = &mut self.windows[handle.index];
        entry.window.shell_handle = entry.shell.as_ref().map(ShellSurface::handle);
    }

    pub fn set_toplevel(&mut self, handle: WindowHandle) -> Result<(), TestError> {
        let (window, shell) = self.entry(handle)?;
        shell.set_toplevel(window)?;
        self.refresh_handle(handle);
        Ok(())
    }

    pub fn set_popup(
        &mut self,
        handle: WindowHandle,
        parent: WindowHandle,
        input: InputContext,
        grab: bool,
    ) -> Result<(), TestError> {
        let parent_window = self.window(parent).clone();
        let (window, shell) = self.entry(handle)?;
        shell.set_popup(window, &parent_window, input, grab)?;
        self.refresh_handle(handle);
        Ok(())
    }

    pub fn set_type(
        &mut self,
        handle: WindowHandle,
        window_type: WindowType,
        parent: Option<WindowHandle>,
    ) -> Result<(), TestError> {
        let parent_window = parent.map(|p| self.window(p).clone());
        let (window, shell) = self.entry(handle)?;
        shell.set_type(window, window_type, parent_window.as_ref().map(|w| w as &dyn ShellWindow))?;
        self.refresh_handle(handle);
        Ok(())
    }

    pub fn set_title(&mut self, handle: WindowHandle, title: &str) -> Result<(), TestError> {
        let (_, shell) = self.entry(handle)?;
        shell.set_title(title);
        Ok(())
    }

    pub fn set_app_id(&mut self, handle: WindowHandle, app_id: &str) -> Result<(), TestError> {
        let (_, shell) = self.entry(handle)?;
        shell.set_app_id(app_id);
        Ok(())
    }

    pub fn request_window_states(
        &mut self,
        handle: WindowHandle,
        states: WindowStates,
    ) -> Result<(), TestError> {
        let (window, shell) = self.entry(handle)?;
        shell.request_window_states(window, states);
        Ok(())
    }

    pub fn resize(
        &mut self,
        handle: WindowHandle,
        input: InputContext,
        edge: ResizeEdge,
    ) -> Result<(), TestError> {
        let (_, shell) = self.entry(handle)?;
        shell.resize(input, edge)?;
        Ok(())
    }

    pub fn move_(&mut self, handle: WindowHandle, input: InputContext) -> Result<bool, TestError> {
        let (_, shell) = self.entry(handle)?;
        Ok(shell.move_(input))
    }

    pub fn expose(
        &mut self,
        handle: WindowHandle,
        region: &Region,
    ) -> Result<ExposeDisposition, TestError> {
        let (_, shell) = self.entry(handle)?;
        Ok(shell.handle_expose(region))
    }

    pub fn wants_decorations(&self, handle: WindowHandle) -> bool {
        self.shell(handle).is_some_and(ShellSurface::wants_decorations)
    }

    fn dispatch(&mut self, handle: WindowHandle, event: ShellEvent) -> Result<(), TestError> {
        let (window, shell) = self.entry(handle)?;
        shell.handle_event(event, window);
        Ok(())
    }

    fn next_serial(&mut self) -> Serial {
        self.next_serial += 1;
        self.next_serial
    }

    /// Send a bare `xdg_surface.configure` and return its serial
    pub fn send_surface_configure(&mut self, handle: WindowHandle) -> Result<Serial, TestError> {
        let serial = self.next_serial();
        self.dispatch(handle, SurfaceEvent::Configure { serial }.into())?;
        Ok(serial)
    }

    /// Send a toplevel configure followed by the surface configure that
    /// terminates it, as a compositor does
    pub fn send_toplevel_configure(
        &mut self,
        handle: WindowHandle,
        size: Size,
        states: &[u32],
    ) -> Result<Serial, TestError> {
        self.dispatch(
            handle,
            ToplevelEvent::Configure {
                width: size.width,
                height: size.height,
                states: states.to_vec(),
            }
            .into(),
        )?;
        self.send_surface_configure(handle)
    }

    pub fn send_close(&mut self, handle: WindowHandle) -> Result<(), TestError> {
        self.dispatch(handle, ToplevelEvent::Close.into())
    }

    pub fn send_popup_configure(&mut self, handle: WindowHandle, rect: Rect) -> Result<Serial, TestError> {
        self.dispatch(
            handle,
            PopupEvent::Configure {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            }
            .into(),
        )?;
        self.send_surface_configure(handle)
    }

    pub fn send_popup_done(&mut self, handle: WindowHandle) -> Result<(), TestError> {
        self.dispatch(handle, PopupEvent::PopupDone.into())
    }

    pub fn send_ping(&mut self, serial: Serial) {
        self.connection.handle_event(WmBaseEvent::Ping { serial });
    }

    /// Let the window layer apply the pending configure (and ack it)
    pub fn apply_configure(&mut self, handle: WindowHandle) -> Result<(), TestError> {
        let (window, shell) = self.entry(handle)?;
        shell.apply_configure(window)?;
        Ok(())
    }

    /// Full configure round trip: toplevel configure, surface configure, apply
    pub fn configure_toplevel(
        &mut self,
        handle: WindowHandle,
        size: Size,
        states: &[u32],
    ) -> Result<Serial, TestError> {
        let serial = self.send_toplevel_configure(handle, size, states)?;
        self.apply_configure(handle)?;
        Ok(serial)
    }

    /// Drop a window's shell surface, as window teardown does
    pub fn destroy_shell_surface(&mut self, handle: WindowHandle) {
        let entry = &mut self.windows[handle.index];
        entry.shell = None;
        entry.window.shell_handle = None;
    }

    pub fn snapshot(&self, handle: WindowHandle) -> Option<ClientSnapshot> {
        let entry = &self.windows[handle.index];
        let shell = entry.shell.as_ref()?;
        let toplevel = shell.toplevel();
        Some(ClientSnapshot {
            phase: shell.phase(),
            pending_serial: shell.pending_serial(),
            configured: shell.is_configured(),
            wants_decorations: shell.wants_decorations(),
            pending_states: toplevel.map(|t| t.pending().states),
            applied_states: toplevel.map(|t| t.applied().states),
            window_states: entry.window.states,
            geometry: entry.window.geometry,
        })
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
