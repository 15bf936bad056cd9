#![no_main]
//! Fuzz target for config TOML parsing
//!
//! Feeds random bytes as TOML to the config parser to find panics,
//! hangs, or unexpected behavior in deserialization and validation.

use libfuzzer_sys::fuzz_target;

use xdg_shell::ShellConfig;

fuzz_target!(|data: &[u8]| {
    // Try parsing as TOML config - must never panic
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = toml::from_str::<ShellConfig>(s) {
            // If parsing succeeded, validation and version clamping must not panic either
            if config.validate().is_ok() {
                let version = config.bind_version(u32::MAX);
                assert!(version <= config.max_version);
            }
        }
    }
});
