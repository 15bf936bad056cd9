//! Test harness for the xdg-shell client
//!
//! Drives the shell state machine without a compositor: requests are
//! recorded instead of sent and the test plays the compositor's part.
//!
//! # Modules
//!
//! - `mock`: Recording transport, window and display doubles
//! - `headless`: `TestClient`, a connection plus windows driven by the test
//! - `assertions`: Common test assertions
//! - `fixtures`: Test fixture helpers

pub mod assertions;
pub mod fixtures;
pub mod headless;
pub mod mock;

pub use headless::{ClientSnapshot, TestClient, TestError, WindowHandle};
pub use mock::{Journal, JournalEntry, MockDisplay, MockWindow, RecordingTransport, WindowEvent};
