#![no_main]
//! Fuzz target for compositor event sequences
//!
//! Interprets the input as a script of compositor events and window-side
//! requests against one toplevel. No sequence may panic, and every ack must
//! carry the serial of the latest configure.

use libfuzzer_sys::fuzz_target;

use test_harness::assertions::acked_serials;
use test_harness::fixtures::unconfigured_toplevel;
use xdg_shell::geometry::{Rect, Region, Size};
use xdg_shell::states::codes_from_wire;
use xdg_shell::WindowStates;

fuzz_target!(|data: &[u8]| {
    let (mut client, window) = unconfigured_toplevel();
    let mut latest = None;

    for op in data.chunks(6) {
        let Some((&kind, rest)) = op.split_first() else {
            continue;
        };
        match kind % 7 {
            0 => {
                let size = Size::new(i32::from(rest.first().copied().unwrap_or(0)) * 8, 600);
                let codes = codes_from_wire(rest);
                latest = client.send_toplevel_configure(window, size, &codes).ok();
            }
            1 => {
                latest = client.send_surface_configure(window).ok();
            }
            2 => {
                let acks_before = acked_serials(client.journal()).len();
                if client.apply_configure(window).is_ok() {
                    let acks = acked_serials(client.journal());
                    assert_eq!(acks.len(), acks_before + 1);
                    assert_eq!(acks.last().copied(), latest);
                }
            }
            3 => {
                let states = WindowStates::from_bits_truncate(rest.first().copied().unwrap_or(0));
                let _ = client.request_window_states(window, states);
            }
            4 => {
                let region = Region::from_rect(Rect::new(0, 0, i32::from(kind), 10));
                let _ = client.expose(window, &region);
            }
            5 => {
                let _ = client.send_close(window);
            }
            _ => client.send_ping(u32::from(kind)),
        }
    }

    // Decoration choice always follows the pending fullscreen bit
    let snapshot = client.snapshot(window);
    if let Some(snapshot) = snapshot {
        let fullscreen = snapshot
            .pending_states
            .is_some_and(|states| states.contains(WindowStates::FULLSCREEN));
        assert_eq!(snapshot.wants_decorations, !fullscreen);
    }
});
