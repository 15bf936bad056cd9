//! Tests for popup behavior
//!
//! These tests verify popup placement relative to the parent, grab serials,
//! role selection by window type and popup dismissal.

use test_harness::assertions::{assert_no_request, count_requests};
use test_harness::fixtures::{configured_toplevel, parent_and_child, NORMAL_GEOMETRY};
use test_harness::{TestClient, TestError};
use xdg_shell::geometry::{Margins, Rect, Size};
use xdg_shell::protocol::{Anchor, Gravity, Interface, Request, ResizeEdge};
use xdg_shell::window::WindowType;
use xdg_shell::ShellError;

const PARENT: Rect = Rect::new(100, 100, 300, 200);
const CHILD: Rect = Rect::new(150, 140, 50, 50);

/// Verify the popup is anchored at its offset from the parent
#[test]
fn popup_anchor_relative_to_parent() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    let input = client.input(42);
    client.journal().clear();

    client.set_popup(child, parent, input, false).unwrap();

    let requests = client.journal().requests();
    let Some(Request::CreatePositioner { id: positioner, .. }) = requests.first().cloned() else {
        panic!("expected positioner creation first, got {:?}", requests.first());
    };
    assert_eq!(client.transport().interface_of(positioner), Some(Interface::Positioner));

    let popup = client.shell(child).unwrap().popup().unwrap().object();
    let child_surface = client.shell(child).unwrap().object();
    let parent_surface = client.shell(parent).unwrap().object();

    assert_eq!(
        requests[1..],
        [
            Request::SetAnchorRect { positioner, rect: Rect::new(50, 40, 1, 1) },
            Request::SetAnchor { positioner, anchor: Anchor::TopLeft },
            Request::SetGravity { positioner, gravity: Gravity::BottomRight },
            Request::SetSize { positioner, size: Size::new(50, 50) },
            Request::GetPopup {
                xdg_surface: child_surface,
                id: popup,
                parent: parent_surface,
                positioner,
            },
            Request::DestroyPositioner { positioner },
        ]
    );
}

/// Verify decoration margins of the parent shift the anchor
#[test]
fn decorated_parent_shifts_anchor() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    client.window_mut(parent).decoration = Some(Margins::new(5, 25, 5, 5));
    let input = client.input(1);

    client.set_popup(child, parent, input, false).unwrap();

    assert_eq!(
        count_requests(client.journal(), |r| matches!(
            r,
            Request::SetAnchorRect { rect, .. } if *rect == Rect::new(55, 65, 1, 1)
        )),
        1
    );
}

/// Verify a grab carries the triggering seat and serial, after the popup exists
#[test]
fn grab_uses_supplied_serial() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    let input = client.input(77);
    client.journal().clear();

    client.set_popup(child, parent, input, true).unwrap();

    let popup = client.shell(child).unwrap().popup().unwrap().object();
    let requests = client.journal().requests();
    assert_eq!(
        requests.last(),
        Some(&Request::Grab { popup, seat: client.seat(), serial: 77 })
    );
}

/// Verify a popup whose parent has no shell role is refused
#[test]
fn popup_needs_shell_parent() {
    let mut client = TestClient::new();
    let parent = client.add_window(PARENT);
    let child = client.add_window(CHILD);
    let input = client.input(1);

    let err = client.set_popup(child, parent, input, true).unwrap_err();
    assert_eq!(err, TestError::Shell(ShellError::ParentNotShellSurface));
    assert!(client.shell(child).unwrap().role().is_none());
}

/// Verify a surface cannot take a second role
#[test]
fn popup_cannot_become_toplevel() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    let input = client.input(1);
    client.set_popup(child, parent, input, false).unwrap();

    let object = client.shell(child).unwrap().object();
    assert_eq!(
        client.set_toplevel(child).unwrap_err(),
        TestError::Shell(ShellError::RoleAlreadyAssigned(object))
    );
    assert_eq!(
        client.set_popup(child, parent, input, false).unwrap_err(),
        TestError::Shell(ShellError::RoleAlreadyAssigned(object))
    );
    assert!(client.shell(child).unwrap().popup().is_some());
}

/// Verify popup type with input and parent creates a grabbing popup
#[test]
fn popup_type_with_input_creates_popup() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    client.simulate_input(500);

    client.set_type(child, WindowType::Popup, Some(parent)).unwrap();

    assert!(client.shell(child).unwrap().popup().is_some());
    assert_eq!(
        count_requests(client.journal(), |r| matches!(r, Request::Grab { serial: 500, .. })),
        1
    );
}

/// Verify tooltips become popups without a grab
#[test]
fn tooltip_type_creates_popup_without_grab() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    client.simulate_input(500);

    client.set_type(child, WindowType::ToolTip, Some(parent)).unwrap();

    assert!(client.shell(child).unwrap().popup().is_some());
    assert_no_request(client.journal(), "grab", |r| matches!(r, Request::Grab { .. }));
}

/// Verify a popup type without any input seen falls back to a toplevel
#[test]
fn popup_type_without_input_falls_back_to_toplevel() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);

    client.set_type(child, WindowType::Popup, Some(parent)).unwrap();

    let shell = client.shell(child).unwrap();
    assert!(shell.popup().is_none());
    assert!(shell.toplevel().is_some());
    assert_no_request(client.journal(), "get_popup", |r| matches!(r, Request::GetPopup { .. }));

    // Still linked to its transient parent as a toplevel
    let toplevel = shell.toplevel().unwrap().object();
    let parent_toplevel = client.shell(parent).unwrap().toplevel().unwrap().object();
    assert_eq!(
        count_requests(client.journal(), |r| *r
            == Request::SetParent { toplevel, parent: Some(parent_toplevel) }),
        1
    );
}

/// Verify a popup type without a parent falls back to a toplevel
#[test]
fn popup_type_without_parent_falls_back_to_toplevel() {
    let mut client = TestClient::new();
    let window = client.add_window(CHILD);
    client.simulate_input(3);

    client.set_type(window, WindowType::Popup, None).unwrap();

    assert!(client.shell(window).unwrap().toplevel().is_some());
    assert_no_request(client.journal(), "set_parent", |r| matches!(r, Request::SetParent { .. }));
}

/// Verify a dialog is linked to its toplevel parent
#[test]
fn dialog_links_to_parent_toplevel() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    client.simulate_input(9);

    client.set_type(child, WindowType::Dialog, Some(parent)).unwrap();

    let toplevel = client.shell(child).unwrap().toplevel().unwrap().object();
    let parent_toplevel = client.shell(parent).unwrap().toplevel().unwrap().object();
    assert_eq!(
        client.journal().requests().last(),
        Some(&Request::SetParent { toplevel, parent: Some(parent_toplevel) })
    );
}

/// Verify a transient parent without its own toplevel is silently skipped
#[test]
fn parent_without_toplevel_is_not_linked() {
    let (mut client, parent, popup) = parent_and_child(PARENT, CHILD);
    client.simulate_input(1);
    client.set_type(popup, WindowType::Popup, Some(parent)).unwrap();

    let dialog = client.add_window(Rect::new(0, 0, 100, 100));
    client.set_type(dialog, WindowType::Dialog, Some(popup)).unwrap();

    assert!(client.shell(dialog).unwrap().toplevel().is_some());
    assert_no_request(client.journal(), "set_parent", |r| matches!(r, Request::SetParent { .. }));
}

/// Verify popup_done asks the window to close without destroying the role
#[test]
fn popup_done_closes_window() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    let input = client.input(1);
    client.set_popup(child, parent, input, true).unwrap();

    client.send_popup_done(child).unwrap();

    assert!(client.window(child).was_closed());
    assert!(client.shell(child).unwrap().popup().is_some());
    assert_no_request(client.journal(), "destroy_popup", |r| {
        matches!(r, Request::DestroyPopup { .. })
    });
}

/// Verify a popup configure is acked without touching the window
#[test]
fn popup_configure_is_acked_without_resize() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    let input = client.input(1);
    client.set_popup(child, parent, input, false).unwrap();

    let serial = client.send_popup_configure(child, Rect::new(50, 40, 50, 50)).unwrap();
    client.apply_configure(child).unwrap();

    assert!(client.window(child).resizes().is_empty());
    assert_eq!(
        count_requests(client.journal(), |r| matches!(r, Request::AckConfigure { serial: s, .. } if *s == serial)),
        1
    );
    assert!(!client.wants_decorations(child));
}

/// Verify toplevel-only requests do nothing on a popup
#[test]
fn toplevel_requests_ignored_on_popup() {
    let (mut client, parent, child) = parent_and_child(PARENT, CHILD);
    let input = client.input(1);
    client.set_popup(child, parent, input, false).unwrap();
    client.journal().clear();

    client.set_title(child, "menu").unwrap();
    client.set_app_id(child, "org.example.Menu").unwrap();
    assert!(!client.move_(child, input).unwrap());

    let object = client.shell(child).unwrap().object();
    assert_eq!(
        client.resize(child, input, ResizeEdge::Bottom).unwrap_err(),
        TestError::Shell(ShellError::NoToplevel(object))
    );
    assert!(client.journal().requests().is_empty());
}

/// Verify move and resize on a toplevel carry seat and serial
#[test]
fn move_and_resize_forward_gesture_serial() {
    let (mut client, window) = configured_toplevel();
    let toplevel = client.shell(window).unwrap().toplevel().unwrap().object();
    let input = client.input(321);
    client.journal().clear();

    assert!(client.move_(window, input).unwrap());
    client.resize(window, input, ResizeEdge::TopLeft).unwrap();

    assert_eq!(
        client.journal().requests(),
        vec![
            Request::Move { toplevel, seat: client.seat(), serial: 321 },
            Request::Resize {
                toplevel,
                seat: client.seat(),
                serial: 321,
                edge: ResizeEdge::TopLeft
            },
        ]
    );
}

/// Verify title and app id are forwarded for toplevels
#[test]
fn title_and_app_id_forwarded() {
    let mut client = TestClient::new();
    let window = client.add_window(NORMAL_GEOMETRY);

    client.set_title(window, "before role").unwrap();
    assert_no_request(client.journal(), "set_title", |r| matches!(r, Request::SetTitle { .. }));

    client.set_toplevel(window).unwrap();
    client.set_title(window, "Editor").unwrap();
    client.set_app_id(window, "org.example.Editor").unwrap();

    let toplevel = client.shell(window).unwrap().toplevel().unwrap().object();
    let requests = client.journal().requests();
    assert!(requests.contains(&Request::SetTitle { toplevel, title: "Editor".into() }));
    assert!(requests.contains(&Request::SetAppId { toplevel, app_id: "org.example.Editor".into() }));
}
