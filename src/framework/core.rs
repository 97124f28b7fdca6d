//! # Core Mailbox Framework
//!
//! This module defines the generic building blocks for a single-writer actor.
//!
//! ## Key Types
//!
//! - [`Action`]: A named unit of work queued in the mailbox.
//! - [`MailboxActor`]: The worker that owns the state and drains the mailbox.
//! - [`MailboxClient`]: The cloneable handle that submits work with admission control.
//! - [`FrameworkError`]: Transport errors (ServiceUnavailable, ActorClosed, ActorDropped).

use std::fmt::Debug;
use std::time::Instant;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Histogram of how long each action occupied the worker, labelled by `action` and `outcome`.
pub const ACTION_DURATION_METRIC: &str = "docstore_event_loop_duration_milliseconds";

/// Counter of submissions rejected because the mailbox was full, labelled by `action`.
pub const MAILBOX_REJECTIONS_METRIC: &str = "docstore_mailbox_rejections_total";

// =============================================================================
// 1. THE ACTION (a named closure over the actor's state)
// =============================================================================

/// The boxed work item. It receives exclusive access to the state and reports
/// whether it succeeded, which is only used for observability.
pub type Operation<S> = Box<dyn FnOnce(&mut S) -> bool + Send + 'static>;

/// A single mailbox entry.
///
/// # Architecture Note
/// Instead of a closed enum of request variants, each entry carries its own closure.
/// The closure captures the request inputs and the caller's completion channel, so the
/// worker never needs to know what the operation means. It only runs it, times it,
/// and labels the measurement with `name`.
pub struct Action<S> {
    name: &'static str,
    operation: Operation<S>,
}

impl<S> Action<S> {
    pub fn new(name: &'static str, operation: impl FnOnce(&mut S) -> bool + Send + 'static) -> Self {
        Self {
            name,
            operation: Box::new(operation),
        }
    }

    /// The label used for metrics and logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Consumes the action, running it against `state`.
    pub fn execute(self, state: &mut S) -> bool {
        (self.operation)(state)
    }
}

impl<S> Debug for Action<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish_non_exhaustive()
    }
}

// =============================================================================
// 2. THE ERRORS
// =============================================================================

/// Errors that can occur within the mailbox framework itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FrameworkError {
    /// The mailbox already holds its maximum number of pending actions.
    #[error("service unavailable")]
    ServiceUnavailable,
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}

// =============================================================================
// 3. THE WORKER
// =============================================================================

/// The generic actor that owns a piece of state.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state and the receiver
/// end of the mailbox. Nothing else holds a reference to `state`, so the loop in
/// [`MailboxActor::run`] is the only code that can ever read or write it. No `Mutex`
/// or `RwLock` is needed.
pub struct MailboxActor<S> {
    receiver: mpsc::Receiver<Action<S>>,
    state: S,
}

impl<S: Send + 'static> MailboxActor<S> {
    /// Creates the actor and the client that feeds it.
    ///
    /// # Arguments
    ///
    /// * `state` - The state the worker will own exclusively.
    /// * `capacity` - How many accepted actions may wait while one is executing.
    ///   Submissions beyond that fail with [`FrameworkError::ServiceUnavailable`].
    pub fn new(state: S, capacity: usize) -> (Self, MailboxClient<S>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let actor = Self { receiver, state };
        (actor, MailboxClient::new(sender))
    }

    /// Runs the event loop until the shutdown signal fires (or its sender is dropped),
    /// or until every client has been dropped. Returns the final state.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> S {
        let state_type = state_type::<S>();
        info!(state_type, "Actor started");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(state_type, "Shutdown signal received");
                    break;
                }
                next = self.receiver.recv() => match next {
                    Some(action) => self.execute(state_type, action),
                    None => {
                        debug!(state_type, "All clients dropped");
                        break;
                    }
                },
            }
        }

        // Stop accepting work. Pending actions are dropped, which drops their
        // completion senders and wakes the waiting callers with ActorDropped.
        self.receiver.close();
        info!(state_type, "Shutdown");
        self.state
    }

    /// Runs the event loop on its own OS thread with a private single-threaded runtime.
    ///
    /// Actions run synchronously on that thread, so a long action (e.g. a sleep) blocks
    /// only the worker and never the runtime serving requests.
    pub fn spawn(self, shutdown: oneshot::Receiver<()>) -> std::io::Result<std::thread::JoinHandle<S>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        std::thread::Builder::new()
            .name(format!("{}-worker", state_type::<S>().to_lowercase()))
            .spawn(move || runtime.block_on(self.run(shutdown)))
    }

    fn execute(&mut self, state_type: &'static str, action: Action<S>) {
        let name = action.name();
        let start = Instant::now();
        let succeeded = action.execute(&mut self.state);
        let elapsed = start.elapsed();

        let outcome = if succeeded { "success" } else { "failure" };
        metrics::histogram!(ACTION_DURATION_METRIC, "action" => name, "outcome" => outcome)
            .record(elapsed.as_secs_f64() * 1000.0);
        debug!(state_type, action = name, outcome, elapsed_ms = elapsed.as_millis() as u64, "Action finished");
    }
}

// Extract just the type name (e.g., "DocumentStore" instead of "docstore::document_actor::store::DocumentStore")
fn state_type<S>() -> &'static str {
    std::any::type_name::<S>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// A cloneable handle for submitting work to a [`MailboxActor`].
pub struct MailboxClient<S> {
    sender: mpsc::Sender<Action<S>>,
}

impl<S> Clone for MailboxClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: Send + 'static> MailboxClient<S> {
    pub fn new(sender: mpsc::Sender<Action<S>>) -> Self {
        Self { sender }
    }

    /// Submits `work` to the actor and waits for its result.
    ///
    /// The enqueue is non-blocking: if the mailbox is full the call fails immediately
    /// with [`FrameworkError::ServiceUnavailable`] instead of queueing. Once accepted,
    /// the action runs to completion even if this future is dropped.
    pub async fn submit<T, E, F>(&self, name: &'static str, work: F) -> Result<Result<T, E>, FrameworkError>
    where
        F: FnOnce(&mut S) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        let action = Action::new(name, move |state: &mut S| {
            let result = work(state);
            let succeeded = result.is_ok();
            // The caller may have timed out and gone away.
            let _ = respond_to.send(result);
            succeeded
        });

        self.sender.try_send(action).map_err(|e| match e {
            TrySendError::Full(_) => {
                warn!(action = name, "service unavailable");
                metrics::counter!(MAILBOX_REJECTIONS_METRIC, "action" => name).increment(1);
                FrameworkError::ServiceUnavailable
            }
            TrySendError::Closed(_) => FrameworkError::ActorClosed,
        })?;

        response.await.map_err(|_| FrameworkError::ActorDropped)
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
    use std::time::Duration;

    type Labels = Vec<(String, String)>;

    fn recorded(snapshotter: &Snapshotter, name: &str) -> Vec<(Labels, DebugValue)> {
        let mut found: Vec<(Labels, DebugValue)> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter(|(key, _, _, _)| key.key().name() == name)
            .map(|(key, _, _, value)| {
                let labels = key
                    .key()
                    .labels()
                    .map(|l| (l.key().to_string(), l.value().to_string()))
                    .collect();
                (labels, value)
            })
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        found
    }

    fn pairs(items: &[(&str, &str)]) -> Labels {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[derive(Debug, Default)]
    struct Counter {
        value: u64,
        log: Vec<&'static str>,
    }

    #[tokio::test]
    async fn test_submit_runs_against_owned_state() {
        let (actor, client) = MailboxActor::new(Counter::default(), 1);
        let (stop, shutdown) = oneshot::channel();
        let handle = tokio::spawn(actor.run(shutdown));

        let result: Result<u64, String> = client
            .submit("increment", |c: &mut Counter| {
                c.value += 1;
                Ok(c.value)
            })
            .await
            .unwrap();
        assert_eq!(result, Ok(1));

        let failed: Result<(), String> = client
            .submit("fail", |_c: &mut Counter| Err("nope".to_string()))
            .await
            .unwrap();
        assert_eq!(failed, Err("nope".to_string()));

        stop.send(()).unwrap();
        let state = handle.await.unwrap();
        assert_eq!(state.value, 1);
    }

    #[tokio::test]
    async fn test_actions_run_in_submission_order() {
        let (actor, client) = MailboxActor::new(Counter::default(), 1);
        let (_stop, shutdown) = oneshot::channel();
        let handle = actor.spawn(shutdown).unwrap();

        for name in ["first", "second", "third"] {
            let _: Result<(), ()> = client
                .submit(name, move |c: &mut Counter| {
                    c.log.push(name);
                    Ok(())
                })
                .await
                .unwrap();
        }

        drop(client);
        let state = tokio::task::spawn_blocking(move || handle.join().unwrap()).await.unwrap();
        assert_eq!(state.log, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_full_mailbox_rejects_immediately() {
        let (actor, client) = MailboxActor::new(Counter::default(), 1);
        let (stop, shutdown) = oneshot::channel();
        let handle = actor.spawn(shutdown).unwrap();

        // Occupy the worker.
        let busy = client.clone();
        let running = tokio::spawn(async move {
            busy.submit("block", |_c: &mut Counter| {
                std::thread::sleep(Duration::from_millis(500));
                Ok::<_, ()>(())
            })
            .await
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Fill the single mailbox slot.
        let queued_client = client.clone();
        let queued = tokio::spawn(async move {
            queued_client
                .submit("queued", |c: &mut Counter| {
                    c.value += 1;
                    Ok::<_, ()>(c.value)
                })
                .await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let rejected = client
            .submit("rejected", |_c: &mut Counter| Ok::<_, ()>(()))
            .await;
        assert_eq!(rejected, Err(FrameworkError::ServiceUnavailable));

        assert_eq!(running.await.unwrap(), Ok(Ok(())));
        assert_eq!(queued.await.unwrap(), Ok(Ok(1)));

        stop.send(()).unwrap();
        tokio::task::spawn_blocking(move || handle.join().unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_closed() {
        let (actor, client) = MailboxActor::new(Counter::default(), 1);
        let (stop, shutdown) = oneshot::channel();
        let handle = tokio::spawn(actor.run(shutdown));
        stop.send(()).unwrap();
        handle.await.unwrap();

        let result = client.submit("late", |_c: &mut Counter| Ok::<_, ()>(())).await;
        assert_eq!(result, Err(FrameworkError::ActorClosed));
    }

    #[tokio::test]
    async fn test_caller_timeout_does_not_cancel_accepted_action() {
        let (actor, client) = MailboxActor::new(Counter::default(), 1);
        let (stop, shutdown) = oneshot::channel();
        let handle = actor.spawn(shutdown).unwrap();

        let busy = client.clone();
        let running = tokio::spawn(async move {
            busy.submit("block", |_c: &mut Counter| {
                std::thread::sleep(Duration::from_millis(300));
                Ok::<_, ()>(())
            })
            .await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Accepted into the mailbox, then abandoned by its caller.
        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            client.submit("increment", |c: &mut Counter| {
                c.value += 1;
                Ok::<_, ()>(c.value)
            }),
        )
        .await;
        assert!(abandoned.is_err());

        assert_eq!(running.await.unwrap(), Ok(Ok(())));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let value = client.submit("read", |c: &mut Counter| Ok::<_, ()>(c.value)).await;
        assert_eq!(value, Ok(Ok(1)));

        stop.send(()).unwrap();
        tokio::task::spawn_blocking(move || handle.join().unwrap()).await.unwrap();
    }

    #[test]
    fn test_actions_and_rejections_are_measured() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let (actor, client) = MailboxActor::new(Counter::default(), 1);
                let (stop, shutdown) = oneshot::channel();
                let handle = tokio::spawn(actor.run(shutdown));

                let ok: Result<(), ()> = client
                    .submit("increment", |c: &mut Counter| {
                        c.value += 1;
                        Ok(())
                    })
                    .await
                    .unwrap();
                assert_eq!(ok, Ok(()));
                let failed: Result<(), ()> = client.submit("fail", |_c: &mut Counter| Err(())).await.unwrap();
                assert_eq!(failed, Err(()));

                stop.send(()).unwrap();
                handle.await.unwrap();

                // Nothing drains this mailbox: the first submission takes the slot.
                let (sender, _receiver) = mpsc::channel(1);
                let idle = MailboxClient::<Counter>::new(sender);
                let waiting = idle.clone();
                tokio::spawn(async move { waiting.submit("queued", |_c: &mut Counter| Ok::<_, ()>(())).await });
                tokio::task::yield_now().await;

                let shed = idle.submit("shed", |_c: &mut Counter| Ok::<_, ()>(())).await;
                assert_eq!(shed, Err(FrameworkError::ServiceUnavailable));
            })
        });

        let actions: Vec<Labels> = recorded(&snapshotter, ACTION_DURATION_METRIC)
            .into_iter()
            .map(|(labels, _)| labels)
            .collect();
        assert_eq!(
            actions,
            vec![
                pairs(&[("action", "fail"), ("outcome", "failure")]),
                pairs(&[("action", "increment"), ("outcome", "success")]),
            ]
        );

        assert_eq!(
            recorded(&snapshotter, MAILBOX_REJECTIONS_METRIC),
            vec![(pairs(&[("action", "shed")]), DebugValue::Counter(1))]
        );
    }
}
