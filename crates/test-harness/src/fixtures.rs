//! Test fixtures for common test scenarios

use xdg_shell::geometry::{Rect, Size};
use xdg_shell::states::code;

use crate::headless::{TestClient, WindowHandle};

/// Standard geometry of a normal window
pub const NORMAL_GEOMETRY: Rect = Rect::new(0, 0, 800, 600);

/// Size compositors hand out for maximized windows in these tests
pub const MAXIMIZED_SIZE: Size = Size::new(1920, 1080);

/// Install a tracing subscriber honouring `RUST_LOG`, once per process
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Create a client with one toplevel that has not seen a configure yet
pub fn unconfigured_toplevel() -> (TestClient, WindowHandle) {
    let mut client = TestClient::new();
    let window = client
        .add_toplevel(NORMAL_GEOMETRY)
        .expect("fresh window accepts toplevel role");
    (client, window)
}

/// Create a client with one toplevel through its first configure/ack
pub fn configured_toplevel() -> (TestClient, WindowHandle) {
    let (mut client, window) = unconfigured_toplevel();
    client
        .configure_toplevel(window, Size::new(0, 0), &[])
        .expect("initial configure applies");
    (client, window)
}

/// Create a client with one configured, activated toplevel
pub fn active_toplevel() -> (TestClient, WindowHandle) {
    let (mut client, window) = configured_toplevel();
    client
        .configure_toplevel(window, Size::new(0, 0), &[code::ACTIVATED])
        .expect("activation configure applies");
    (client, window)
}

/// Create a client with a configured parent toplevel at `parent` and a
/// second, role-less window at `child`
pub fn parent_and_child(parent: Rect, child: Rect) -> (TestClient, WindowHandle, WindowHandle) {
    let mut client = TestClient::new();
    let parent_handle = client
        .add_toplevel(parent)
        .expect("fresh window accepts toplevel role");
    client
        .configure_toplevel(parent_handle, Size::new(0, 0), &[])
        .expect("initial configure applies");
    let child_handle = client.add_window(child);
    (client, parent_handle, child_handle)
}
