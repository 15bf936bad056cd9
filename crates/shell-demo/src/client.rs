//! Client state and wayland dispatch
//!
//! Globals are bound from the registry; once both `wl_compositor` and
//! `xdg_wm_base` are known a single gradient window is created as a
//! toplevel. Shell events are forwarded to the core, which calls back into
//! [`DemoWindow`].

use std::os::unix::io::AsFd;
use std::rc::Rc;

use anyhow::{Context, Result};
use wayland_client::protocol::{
    wl_buffer, wl_compositor, wl_keyboard, wl_pointer, wl_registry, wl_seat, wl_shm, wl_shm_pool,
    wl_surface,
};
use wayland_client::{delegate_noop, Connection, Dispatch, QueueHandle, WEnum};
use wayland_protocols::xdg::shell::client::{
    xdg_popup, xdg_positioner, xdg_surface, xdg_toplevel, xdg_wm_base,
};
use xdg_shell::geometry::Region;
use xdg_shell::protocol::{
    ObjectId, PopupEvent, ShellEvent, SurfaceEvent, ToplevelEvent, WmBaseEvent,
};
use xdg_shell::states::codes_from_wire;
use xdg_shell::window::{InputContext, ShellWindow, WindowId, WindowType};
use xdg_shell::{ExposeDisposition, ShellConfig, ShellConnection, ShellSurface, WindowStates};

use crate::buffers::BufferSlot;
use crate::wayland::{Proxy, WaylandTransport};
use crate::window::{draw, DemoDisplay, DemoWindow, Frame};

const KEY_ESC: u32 = 1;
const KEY_F: u32 = 33;
const KEY_N: u32 = 49;
const KEY_M: u32 = 50;
const BTN_LEFT: u32 = 0x110;

/// The one window, with its surface and shell state
struct App {
    surface: wl_surface::WlSurface,
    shell: ShellSurface,
    window: DemoWindow,
    buffers: BufferSlot<wl_buffer::WlBuffer>,
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffers.take() {
            buffer.destroy();
        }
    }
}

impl App {
    fn owns(&self, object: ObjectId) -> bool {
        self.shell.object() == object || self.shell.role().map(|role| role.object()) == Some(object)
    }
}

pub struct State {
    pub running: bool,
    config: ShellConfig,
    transport: Rc<WaylandTransport>,
    display: Rc<DemoDisplay>,
    compositor: Option<wl_compositor::WlCompositor>,
    shm: Option<wl_shm::WlShm>,
    seat: Option<ObjectId>,
    // Dropped before the connection so the surface is destroyed first
    app: Option<App>,
    connection: Option<Rc<ShellConnection>>,
}

impl State {
    pub fn new(config: ShellConfig, qh: QueueHandle<State>) -> Self {
        Self {
            running: true,
            config,
            transport: Rc::new(WaylandTransport::new(qh)),
            display: Rc::new(DemoDisplay::default()),
            compositor: None,
            shm: None,
            seat: None,
            app: None,
            connection: None,
        }
    }

    fn init_window(&mut self, qh: &QueueHandle<State>) -> Result<()> {
        let (Some(compositor), Some(connection)) = (self.compositor.as_ref(), self.connection.as_ref())
        else {
            return Ok(());
        };
        if self.app.is_some() {
            return Ok(());
        }

        let surface = compositor.create_surface(qh, ());
        let surface_id = self.transport.register(Proxy::Surface(surface.clone()));
        let mut window = DemoWindow::new(WindowId(1), surface_id);

        let mut shell = connection.create_shell_surface(&window);
        shell.set_type(&mut window, WindowType::Normal, None)?;
        window.set_shell_handle(shell.handle());
        shell.set_title(self.config.title.as_deref().unwrap_or("xdg-shell-demo"));
        shell.set_app_id(self.config.app_id.as_deref().unwrap_or("org.example.XdgShellDemo"));

        // Ask for a first frame; held back until the initial configure
        let size = window.size();
        let region = Region::from_rect(window.geometry());
        if shell.handle_expose(&region) == ExposeDisposition::Passthrough {
            window.handle_expose(region);
        }

        surface.commit();
        tracing::info!(width = size.width, height = size.height, "window created, waiting for configure");

        self.app = Some(App {
            surface,
            shell,
            window,
            buffers: BufferSlot::default(),
        });
        Ok(())
    }

    /// Run the work the core scheduled during dispatch
    pub fn flush(&mut self, qh: &QueueHandle<State>) -> Result<()> {
        let Some(app) = self.app.as_mut() else {
            return Ok(());
        };

        if app.window.needs_apply {
            app.window.needs_apply = false;
            app.shell
                .apply_configure(&mut app.window)
                .context("failed to apply configure")?;
            app.window.configure_acked();
        }

        let shm = self.shm.as_ref().filter(|_| app.shell.is_configured());
        match (app.window.next_frame(shm.is_some()), shm) {
            (Frame::Redraw, Some(shm)) => redraw(app, shm, qh)?,
            (Frame::Commit, _) => app.surface.commit(),
            _ => {}
        }

        if app.window.closed {
            self.running = false;
        }
        Ok(())
    }

    fn handle_shell_event(&mut self, object: ObjectId, event: ShellEvent) {
        match self.app.as_mut() {
            Some(app) if app.owns(object) => app.shell.handle_event(event, &mut app.window),
            _ => tracing::warn!(%object, ?event, "event for unknown shell object"),
        }
    }

    fn handle_key(&mut self, key: u32, serial: u32) {
        if let Some(seat) = self.seat {
            self.display.record_input(InputContext { seat, serial });
        }
        if key == KEY_ESC {
            self.running = false;
            return;
        }
        let Some(app) = self.app.as_mut() else {
            return;
        };

        let current = app.window.window_states();
        let requested = match key {
            KEY_F => current ^ WindowStates::FULLSCREEN,
            KEY_M => current ^ WindowStates::MAXIMIZED,
            KEY_N => current | WindowStates::MINIMIZED,
            _ => return,
        };
        tracing::info!(?current, ?requested, "requesting window states");
        app.shell.request_window_states(&mut app.window, requested);
    }

    fn handle_button(&mut self, button: u32, serial: u32) {
        let Some(seat) = self.seat else {
            return;
        };
        let input = InputContext { seat, serial };
        self.display.record_input(input);

        if button == BTN_LEFT {
            if let Some(app) = self.app.as_ref() {
                app.shell.move_(input);
            }
        }
    }
}

fn redraw(app: &mut App, shm: &wl_shm::WlShm, qh: &QueueHandle<State>) -> Result<()> {
    let size = app.window.size();
    let stride = size.width * 4;

    let mut file = tempfile::tempfile().context("failed to create SHM file")?;
    draw(&mut file, size).context("failed to draw frame")?;

    let pool = shm.create_pool(file.as_fd(), stride * size.height, qh, ());
    let buffer = pool.create_buffer(
        0,
        size.width,
        size.height,
        stride,
        wl_shm::Format::Argb8888,
        qh,
        (),
    );
    pool.destroy();

    app.surface.attach(Some(&buffer), 0, 0);
    app.surface.damage(0, 0, size.width, size.height);
    app.surface.commit();
    if let Some(previous) = app.buffers.replace(buffer) {
        previous.destroy();
    }

    tracing::debug!(width = size.width, height = size.height, "committed frame");
    Ok(())
}

// --- Wayland dispatch implementations ---

impl Dispatch<wl_registry::WlRegistry, ()> for State {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let wl_registry::Event::Global { name, interface, version } = event else {
            return;
        };
        match &interface[..] {
            "wl_compositor" => {
                state.compositor =
                    Some(registry.bind::<wl_compositor::WlCompositor, _, _>(name, 1, qh, ()));
            }
            "wl_shm" => {
                state.shm = Some(registry.bind::<wl_shm::WlShm, _, _>(name, 1, qh, ()));
            }
            "wl_seat" => {
                let seat = registry.bind::<wl_seat::WlSeat, _, _>(name, 1, qh, ());
                state.seat = Some(state.transport.register(Proxy::Seat(seat)));
            }
            "xdg_wm_base" => {
                let version = state.config.bind_version(version);
                let wm_base = registry.bind::<xdg_wm_base::XdgWmBase, _, _>(name, version, qh, ());
                let wm_base_id = state.transport.register(Proxy::WmBase(wm_base));
                state.connection = Some(ShellConnection::new(
                    state.transport.clone(),
                    state.display.clone(),
                    wm_base_id,
                    version,
                    state.config.clone(),
                ));
            }
            _ => return,
        }

        if let Err(e) = state.init_window(qh) {
            tracing::error!(error = %e, "failed to create window");
            state.running = false;
        }
    }
}

impl Dispatch<xdg_wm_base::XdgWmBase, ()> for State {
    fn event(
        state: &mut Self,
        _: &xdg_wm_base::XdgWmBase,
        event: xdg_wm_base::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let (xdg_wm_base::Event::Ping { serial }, Some(connection)) = (event, state.connection.as_ref()) {
            connection.handle_event(WmBaseEvent::Ping { serial });
        }
    }
}

impl Dispatch<xdg_surface::XdgSurface, ObjectId> for State {
    fn event(
        state: &mut Self,
        _: &xdg_surface::XdgSurface,
        event: xdg_surface::Event,
        id: &ObjectId,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_surface::Event::Configure { serial } = event {
            state.handle_shell_event(*id, SurfaceEvent::Configure { serial }.into());
        }
    }
}

impl Dispatch<xdg_toplevel::XdgToplevel, ObjectId> for State {
    fn event(
        state: &mut Self,
        _: &xdg_toplevel::XdgToplevel,
        event: xdg_toplevel::Event,
        id: &ObjectId,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        let event = match event {
            xdg_toplevel::Event::Configure { width, height, states } => ToplevelEvent::Configure {
                width,
                height,
                states: codes_from_wire(&states),
            },
            xdg_toplevel::Event::Close => ToplevelEvent::Close,
            other => {
                tracing::trace!(?other, "ignoring toplevel event");
                return;
            }
        };
        state.handle_shell_event(*id, event.into());
    }
}

impl Dispatch<xdg_popup::XdgPopup, ObjectId> for State {
    fn event(
        state: &mut Self,
        _: &xdg_popup::XdgPopup,
        event: xdg_popup::Event,
        id: &ObjectId,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        let event = match event {
            xdg_popup::Event::Configure { x, y, width, height } => {
                PopupEvent::Configure { x, y, width, height }
            }
            xdg_popup::Event::PopupDone => PopupEvent::PopupDone,
            other => {
                tracing::trace!(?other, "ignoring popup event");
                return;
            }
        };
        state.handle_shell_event(*id, event.into());
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for State {
    fn event(
        _: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_seat::Event::Capabilities {
            capabilities: WEnum::Value(capabilities),
        } = event
        {
            if capabilities.contains(wl_seat::Capability::Keyboard) {
                seat.get_keyboard(qh, ());
            }
            if capabilities.contains(wl_seat::Capability::Pointer) {
                seat.get_pointer(qh, ());
            }
        }
    }
}

impl Dispatch<wl_keyboard::WlKeyboard, ()> for State {
    fn event(
        state: &mut Self,
        _: &wl_keyboard::WlKeyboard,
        event: wl_keyboard::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_keyboard::Event::Key {
            serial,
            key,
            state: WEnum::Value(wl_keyboard::KeyState::Pressed),
            ..
        } = event
        {
            state.handle_key(key, serial);
        }
    }
}

impl Dispatch<wl_pointer::WlPointer, ()> for State {
    fn event(
        state: &mut Self,
        _: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_pointer::Event::Button {
            serial,
            button,
            state: WEnum::Value(wl_pointer::ButtonState::Pressed),
            ..
        } = event
        {
            state.handle_button(button, serial);
        }
    }
}

impl Dispatch<wl_buffer::WlBuffer, ()> for State {
    fn event(
        state: &mut Self,
        buffer: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            let destroy = match state.app.as_mut() {
                Some(app) => app.buffers.release(buffer),
                None => true,
            };
            if destroy {
                buffer.destroy();
            }
        }
    }
}

delegate_noop!(State: ignore wl_compositor::WlCompositor);
delegate_noop!(State: ignore wl_surface::WlSurface);
delegate_noop!(State: ignore wl_shm::WlShm);
delegate_noop!(State: ignore wl_shm_pool::WlShmPool);
delegate_noop!(State: ignore xdg_positioner::XdgPositioner);
