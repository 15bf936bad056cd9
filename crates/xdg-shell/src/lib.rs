//! xdg-shell client library
//!
//! Client-side state machine for the XDG shell protocol: role assignment,
//! configure/ack sequencing, window state requests and popup placement.
//! Wire encoding and the socket live behind the [`protocol::Transport`] trait.

pub mod config;
pub mod connection;
pub mod error;
pub mod geometry;
pub mod positioner;
pub mod protocol;
pub mod role;
pub mod shell_surface;
pub mod states;
pub mod window;

#[cfg(test)]
mod test_util;

pub use config::ShellConfig;
pub use connection::ShellConnection;
pub use error::ShellError;
pub use shell_surface::{ExposeDisposition, ShellSurface, SurfacePhase};
pub use states::WindowStates;
