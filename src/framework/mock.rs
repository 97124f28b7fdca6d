//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its mailbox.
//! Nothing drains that mailbox unless the test does, which makes two things easy:
//!
//! - inspecting what a client submitted ([`expect_action`]) and running it against a
//!   hand-built state ([`run_next`]),
//! - holding the mailbox full on purpose to exercise admission control.

use crate::framework::{Action, MailboxClient};
use tokio::sync::mpsc;

/// Creates a mock client and a receiver for asserting submitted actions.
///
/// # Testing Strategy
/// In unit tests, we don't want to spin up a worker thread if we are just testing the
/// *client* logic (validation, error mapping). Instead the test plays the worker: it
/// receives each [`Action`], checks its name, and executes it against a state it
/// controls. This keeps the tests deterministic.
pub fn create_mock_client<S: Send + 'static>(capacity: usize) -> (MailboxClient<S>, mpsc::Receiver<Action<S>>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (MailboxClient::new(sender), receiver)
}

/// Helper to receive the next submitted action.
pub async fn expect_action<S>(receiver: &mut mpsc::Receiver<Action<S>>) -> Option<Action<S>> {
    receiver.recv().await
}

/// Helper that receives the next action, asserts its name, and runs it against `state`.
///
/// Returns the success flag the action reported.
pub async fn run_next<S>(receiver: &mut mpsc::Receiver<Action<S>>, expected_name: &str, state: &mut S) -> bool {
    let action = expect_action(receiver)
        .await
        .unwrap_or_else(|| panic!("Expected action '{expected_name}', mailbox closed"));
    assert_eq!(action.name(), expected_name, "Unexpected action");
    action.execute(state)
}
