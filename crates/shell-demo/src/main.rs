//! Minimal xdg-shell client driving the shell core over a real compositor.
//!
//! Draws a gradient window that follows the sizes the compositor configures.
//! Run inside any xdg-shell compositor:
//!
//!     cargo run -p xdg-shell-demo
//!
//! ESC quits, F toggles fullscreen, M toggles maximized, N minimizes and a
//! left click starts an interactive move.

mod buffers;
mod client;
mod wayland;
mod window;

use anyhow::{Context, Result};
use wayland_client::Connection;
use xdg_shell::ShellConfig;

use crate::client::State;

fn main() -> Result<()> {
    setup_logging();

    let config = ShellConfig::load();

    let conn = Connection::connect_to_env()
        .context("failed to connect to Wayland display, is WAYLAND_DISPLAY set?")?;

    let mut event_queue = conn.new_event_queue();
    let qh = event_queue.handle();

    let display = conn.display();
    display.get_registry(&qh, ());

    let mut state = State::new(config, qh.clone());

    tracing::info!("xdg-shell-demo started, press ESC to quit");

    while state.running {
        event_queue
            .blocking_dispatch(&mut state)
            .context("wayland dispatch failed")?;
        state.flush(&qh)?;
    }

    // Tear down the window and the wm_base before disconnecting
    drop(state);
    conn.flush().context("failed to flush final requests")?;

    tracing::info!("exiting");
    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Respect NO_COLOR environment variable for testing
    let use_ansi = std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_ansi(use_ansi),
        )
        .with(filter)
        .init();
}
