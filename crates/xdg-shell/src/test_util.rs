//! Minimal fakes for unit tests. The test-harness crate has the full ones.

use std::cell::{Cell, RefCell};

use crate::geometry::{Margins, Rect, Region, Size};
use crate::protocol::{Interface, ObjectId, Request, Transport};
use crate::states::WindowStates;
use crate::window::{DisplayHandler, InputContext, ShellHandle, ShellWindow, WindowId};

#[derive(Default)]
pub struct FakeTransport {
    next_id: Cell<u32>,
    requests: RefCell<Vec<Request>>,
}

impl FakeTransport {
    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn clear(&self) {
        self.requests.borrow_mut().clear();
    }
}

impl Transport for FakeTransport {
    fn allocate(&self, _interface: Interface) -> ObjectId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        ObjectId(id)
    }

    fn send(&self, request: Request) {
        self.requests.borrow_mut().push(request);
    }
}

#[derive(Default)]
pub struct FakeDisplay {
    pub activated: Cell<u32>,
    pub deactivated: Cell<u32>,
    pub last_input: Cell<Option<InputContext>>,
}

impl DisplayHandler for FakeDisplay {
    fn window_activated(&self, _window: WindowId) {
        self.activated.set(self.activated.get() + 1);
    }

    fn window_deactivated(&self, _window: WindowId) {
        self.deactivated.set(self.deactivated.get() + 1);
    }

    fn last_input(&self) -> Option<InputContext> {
        self.last_input.get()
    }
}

pub struct FakeWindow {
    pub id: WindowId,
    pub frame: Rect,
    pub states: WindowStates,
    pub closed: bool,
    pub resizes: Vec<Size>,
}

impl FakeWindow {
    pub fn new(id: u64) -> Self {
        Self {
            id: WindowId(id),
            frame: Rect::new(0, 0, 640, 480),
            states: WindowStates::empty(),
            closed: false,
            resizes: Vec::new(),
        }
    }
}

impl ShellWindow for FakeWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn surface(&self) -> ObjectId {
        ObjectId(1000 + self.id.0 as u32)
    }

    fn geometry(&self) -> Rect {
        self.frame
    }

    fn frame_geometry(&self) -> Rect {
        self.frame
    }

    fn window_states(&self) -> WindowStates {
        self.states
    }

    fn resize_from_apply_configure(&mut self, size: Size) {
        self.resizes.push(size);
    }

    fn handle_window_states_changed(&mut self, states: WindowStates) {
        self.states = states;
    }

    fn apply_configure_when_possible(&mut self) {}

    fn decoration_margins(&self) -> Option<Margins> {
        None
    }

    fn handle_expose(&mut self, _region: Region) {}

    fn close(&mut self) {
        self.closed = true;
    }

    fn shell_handle(&self) -> Option<ShellHandle> {
        None
    }
}
