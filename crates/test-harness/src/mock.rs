//! Test doubles for the layers around the shell core
//!
//! The transport and the display write into one shared [`Journal`], so tests
//! can check the relative order of requests and activation notifications.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use xdg_shell::geometry::{Margins, Rect, Region, Size};
use xdg_shell::protocol::{Interface, ObjectId, Request, Transport};
use xdg_shell::window::{DisplayHandler, InputContext, ShellHandle, ShellWindow, WindowId};
use xdg_shell::WindowStates;

/// One observable side effect of the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    Request(Request),
    Activated(WindowId),
    Deactivated(WindowId),
}

/// Ordered record shared by the transport and the display
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<JournalEntry>>>);

impl Journal {
    pub fn push(&self, entry: JournalEntry) {
        self.0.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.0.borrow().clone()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.0
            .borrow()
            .iter()
            .filter_map(|entry| match entry {
                JournalEntry::Request(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Everything recorded so far, leaving the journal empty
    pub fn take(&self) -> Vec<JournalEntry> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Transport that hands out sequential ids and records every request
pub struct RecordingTransport {
    journal: Journal,
    next_id: Cell<u32>,
    interfaces: RefCell<HashMap<ObjectId, Interface>>,
}

impl RecordingTransport {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            next_id: Cell::new(0),
            interfaces: RefCell::new(HashMap::new()),
        }
    }

    /// Interface an id was allocated for
    pub fn interface_of(&self, id: ObjectId) -> Option<Interface> {
        self.interfaces.borrow().get(&id).copied()
    }

    /// Reserve an id outside the shell interfaces (surfaces, seats)
    pub fn external_object(&self) -> ObjectId {
        self.next()
    }

    fn next(&self) -> ObjectId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        ObjectId(id)
    }
}

impl Transport for RecordingTransport {
    fn allocate(&self, interface: Interface) -> ObjectId {
        let id = self.next();
        self.interfaces.borrow_mut().insert(id, interface);
        id
    }

    fn send(&self, request: Request) {
        tracing::trace!(?request, "recorded request");
        self.journal.push(JournalEntry::Request(request));
    }
}

/// Display double recording activation edges
pub struct MockDisplay {
    journal: Journal,
    last_input: Cell<Option<InputContext>>,
}

impl MockDisplay {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            last_input: Cell::new(None),
        }
    }

    pub fn set_last_input(&self, input: Option<InputContext>) {
        self.last_input.set(input);
    }
}

impl DisplayHandler for MockDisplay {
    fn window_activated(&self, window: WindowId) {
        self.journal.push(JournalEntry::Activated(window));
    }

    fn window_deactivated(&self, window: WindowId) {
        self.journal.push(JournalEntry::Deactivated(window));
    }

    fn last_input(&self) -> Option<InputContext> {
        self.last_input.get()
    }
}

/// Callback a [`MockWindow`] received from the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    Resized(Size),
    StatesChanged(WindowStates),
    ApplyConfigureRequested,
    Exposed(Region),
    Closed,
}

/// Window double
///
/// Geometry and states are plain fields; `resize_from_apply_configure` and
/// `handle_window_states_changed` update them the way a real window would.
#[derive(Debug, Clone)]
pub struct MockWindow {
    pub id: WindowId,
    pub surface: ObjectId,
    pub geometry: Rect,
    pub decoration: Option<Margins>,
    pub states: WindowStates,
    pub shell_handle: Option<ShellHandle>,
    pub events: Vec<WindowEvent>,
}

impl MockWindow {
    pub fn new(id: WindowId, surface: ObjectId, geometry: Rect) -> Self {
        Self {
            id,
            surface,
            geometry,
            decoration: None,
            states: WindowStates::empty(),
            shell_handle: None,
            events: Vec::new(),
        }
    }

    pub fn take_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn resizes(&self) -> Vec<Size> {
        self.events
            .iter()
            .filter_map(|event| match event {
                WindowEvent::Resized(size) => Some(*size),
                _ => None,
            })
            .collect()
    }

    pub fn exposes(&self) -> Vec<Region> {
        self.events
            .iter()
            .filter_map(|event| match event {
                WindowEvent::Exposed(region) => Some(region.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn was_closed(&self) -> bool {
        self.events.contains(&WindowEvent::Closed)
    }
}

impl ShellWindow for MockWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn surface(&self) -> ObjectId {
        self.surface
    }

    fn geometry(&self) -> Rect {
        self.geometry
    }

    fn frame_geometry(&self) -> Rect {
        let Some(margins) = self.decoration else {
            return self.geometry;
        };
        Rect::new(
            self.geometry.x - margins.left,
            self.geometry.y - margins.top,
            self.geometry.width + margins.left + margins.right,
            self.geometry.height + margins.top + margins.bottom,
        )
    }

    fn window_states(&self) -> WindowStates {
        self.states
    }

    /// `size` is a frame size; decorations are taken off the content area
    fn resize_from_apply_configure(&mut self, size: Size) {
        if !size.is_empty() {
            let margins = self.decoration.unwrap_or_default();
            self.geometry.width = size.width - margins.left - margins.right;
            self.geometry.height = size.height - margins.top - margins.bottom;
        }
        self.events.push(WindowEvent::Resized(size));
    }

    fn handle_window_states_changed(&mut self, states: WindowStates) {
        self.states = states;
        self.events.push(WindowEvent::StatesChanged(states));
    }

    fn apply_configure_when_possible(&mut self) {
        self.events.push(WindowEvent::ApplyConfigureRequested);
    }

    fn decoration_margins(&self) -> Option<Margins> {
        self.decoration
    }

    fn handle_expose(&mut self, region: Region) {
        self.events.push(WindowEvent::Exposed(region));
    }

    fn close(&mut self) {
        self.events.push(WindowEvent::Closed);
    }

    fn shell_handle(&self) -> Option<ShellHandle> {
        self.shell_handle
    }
}
