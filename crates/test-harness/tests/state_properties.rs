//! Property-based tests for shell state invariants
//!
//! These tests verify that invariants hold across arbitrary sequences of
//! configures and state requests.

use proptest::prelude::*;
use test_harness::assertions::{acked_serials, assert_activation_edges, count_requests};
use test_harness::fixtures::{configured_toplevel, unconfigured_toplevel};
use test_harness::TestClient;
use xdg_shell::geometry::{Rect, Size};
use xdg_shell::protocol::Request;
use xdg_shell::states::code;
use xdg_shell::WindowStates;

fn requestable_states() -> impl Strategy<Value = WindowStates> {
    (any::<bool>(), any::<bool>()).prop_map(|(maximized, fullscreen)| {
        let mut states = WindowStates::empty();
        states.set(WindowStates::MAXIMIZED, maximized);
        states.set(WindowStates::FULLSCREEN, fullscreen);
        states
    })
}

fn codes_for(states: WindowStates) -> Vec<u32> {
    let mut codes = Vec::new();
    if states.contains(WindowStates::MAXIMIZED) {
        codes.push(code::MAXIMIZED);
    }
    if states.contains(WindowStates::FULLSCREEN) {
        codes.push(code::FULLSCREEN);
    }
    codes
}

proptest! {
    /// A compositor that grants every request leaves the applied state equal
    /// to the last request
    #[test]
    fn granted_requests_become_applied(
        requests in prop::collection::vec(requestable_states(), 1..8),
    ) {
        let (mut client, window) = configured_toplevel();

        for states in &requests {
            client.request_window_states(window, *states).unwrap();
            client
                .configure_toplevel(window, Size::new(0, 0), &codes_for(*states))
                .unwrap();

            let snapshot = client.snapshot(window).unwrap();
            prop_assert_eq!(snapshot.applied_states, Some(*states));
            prop_assert_eq!(snapshot.window_states, *states);
        }
    }

    /// Activation notifications match the rising and falling edges of the
    /// applied activated state
    #[test]
    fn activation_edges_match_transitions(
        sequence in prop::collection::vec(any::<bool>(), 0..20),
    ) {
        let (mut client, window) = configured_toplevel();
        let id = client.window(window).id;

        let mut active = false;
        let (mut up, mut down) = (0, 0);
        for activated in sequence {
            let codes: &[u32] = if activated { &[code::ACTIVATED] } else { &[] };
            client.configure_toplevel(window, Size::new(0, 0), codes).unwrap();
            match (active, activated) {
                (false, true) => up += 1,
                (true, false) => down += 1,
                _ => {}
            }
            active = activated;
        }

        assert_activation_edges(client.journal(), id, up, down);
    }

    /// Decorations are wanted exactly when the pending state is not fullscreen
    #[test]
    fn decorations_track_pending_fullscreen(
        codes in prop::collection::vec(0u32..12, 0..6),
        apply in any::<bool>(),
    ) {
        let (mut client, window) = unconfigured_toplevel();

        client.send_toplevel_configure(window, Size::new(0, 0), &codes).unwrap();
        if apply {
            client.apply_configure(window).unwrap();
        }

        prop_assert_eq!(client.wants_decorations(window), !codes.contains(&code::FULLSCREEN));
    }

    /// Codes past the defined range never change the decoded set
    #[test]
    fn unknown_codes_are_ignored(
        known in prop::collection::vec(1u32..=4, 0..4),
        unknown in prop::collection::vec(5u32..1000, 0..6),
    ) {
        let mut mixed = known.clone();
        mixed.extend(&unknown);

        prop_assert_eq!(WindowStates::from_codes(&mixed), WindowStates::from_codes(&known));
        prop_assert!(!WindowStates::from_codes(&mixed).contains(WindowStates::MINIMIZED));
    }

    /// Only the last configure of each batch is acked, once per apply
    #[test]
    fn latest_serial_acked_per_batch(
        batches in prop::collection::vec(1usize..4, 1..6),
    ) {
        let (mut client, window) = unconfigured_toplevel();

        let mut expected = Vec::new();
        for batch in batches {
            let mut last = 0;
            for _ in 0..batch {
                last = client.send_toplevel_configure(window, Size::new(0, 0), &[]).unwrap();
            }
            client.apply_configure(window).unwrap();
            expected.push(last);
        }

        prop_assert_eq!(acked_serials(client.journal()), expected);
        prop_assert!(client.apply_configure(window).is_err());
    }

    /// Maximizing and restoring returns the window to its starting size
    #[test]
    fn restore_returns_to_normal_size(
        width in 100i32..2000,
        height in 100i32..1500,
        fullscreen in any::<bool>(),
    ) {
        let mut client = TestClient::new();
        let window = client.add_toplevel(Rect::new(0, 0, width, height)).unwrap();
        client.configure_toplevel(window, Size::new(0, 0), &[]).unwrap();

        let state = if fullscreen { code::FULLSCREEN } else { code::MAXIMIZED };
        client.configure_toplevel(window, Size::new(2560, 1440), &[state]).unwrap();
        client.configure_toplevel(window, Size::new(0, 0), &[]).unwrap();

        prop_assert_eq!(client.window(window).geometry.size(), Size::new(width, height));
    }

    /// Every requested minimize reaches the compositor
    #[test]
    fn every_minimize_is_sent(
        requests in prop::collection::vec(any::<bool>(), 0..10),
    ) {
        let (mut client, window) = configured_toplevel();

        for minimize in &requests {
            let states = if *minimize { WindowStates::MINIMIZED } else { WindowStates::empty() };
            client.request_window_states(window, states).unwrap();
        }

        let expected = requests.iter().filter(|m| **m).count();
        prop_assert_eq!(
            count_requests(client.journal(), |r| matches!(r, Request::SetMinimized { .. })),
            expected
        );
    }
}
