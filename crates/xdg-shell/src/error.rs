//! Error types

use thiserror::Error;

use crate::protocol::ObjectId;

/// Caller contract violations
///
/// None of these are recoverable runtime conditions: they mean the window
/// layer drove the shell surface out of order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("xdg_surface {0} already has a role")]
    RoleAlreadyAssigned(ObjectId),

    #[error("xdg_surface {0} has no toplevel role")]
    NoToplevel(ObjectId),

    #[error("xdg_surface {0} has no pending configure to apply")]
    NoPendingConfigure(ObjectId),

    #[error("popup parent has no shell surface")]
    ParentNotShellSurface,

    #[error("shell connection is gone")]
    ConnectionGone,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_version {0} outside supported range {min}..={max}", min = crate::config::MIN_VERSION, max = crate::config::MAX_VERSION)]
    UnsupportedVersion(u32),
}
