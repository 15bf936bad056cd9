//! Test assertions for shell client state

use xdg_shell::protocol::{Request, Serial};
use xdg_shell::window::WindowId;

use crate::mock::{Journal, JournalEntry};

/// Number of requests matching `pred`
pub fn count_requests(journal: &Journal, pred: impl Fn(&Request) -> bool) -> usize {
    journal.requests().iter().filter(|r| pred(r)).count()
}

/// Serials acked so far, in order
pub fn acked_serials(journal: &Journal) -> Vec<Serial> {
    journal
        .requests()
        .iter()
        .filter_map(|r| match r {
            Request::AckConfigure { serial, .. } => Some(*serial),
            _ => None,
        })
        .collect()
}

/// Assert the exact activation edges recorded for `window`
pub fn assert_activation_edges(journal: &Journal, window: WindowId, activated: usize, deactivated: usize) {
    let entries = journal.entries();
    let got_activated = entries
        .iter()
        .filter(|e| **e == JournalEntry::Activated(window))
        .count();
    let got_deactivated = entries
        .iter()
        .filter(|e| **e == JournalEntry::Deactivated(window))
        .count();

    assert_eq!(
        (got_activated, got_deactivated),
        (activated, deactivated),
        "activation edges for {}: expected {} up / {} down, got {} up / {} down",
        window,
        activated,
        deactivated,
        got_activated,
        got_deactivated
    );
}

/// Assert no request in the journal matches `pred`
pub fn assert_no_request(journal: &Journal, what: &str, pred: impl Fn(&Request) -> bool) {
    let requests = journal.requests();
    if let Some(found) = requests.iter().find(|r| pred(r)) {
        panic!("expected no {} request, found {:?}", what, found);
    }
}

/// Position of the first entry matching `pred`
pub fn position_of(journal: &Journal, pred: impl Fn(&JournalEntry) -> bool) -> Option<usize> {
    journal.entries().iter().position(|e| pred(e))
}
