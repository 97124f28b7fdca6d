use std::thread::JoinHandle;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::clients::StoreClient;
use crate::document_actor::{self, DocumentStore, StoreOptions};

/// The runtime orchestrator for the document store.
///
/// `DocumentSystem` is responsible for:
/// - **Lifecycle Management**: starting the worker thread and stopping it again
/// - **Dependency Wiring**: handing out the [`StoreClient`] the HTTP layer talks to
///
/// # Example
///
/// ```ignore
/// let system = DocumentSystem::new(&StoreOptions::default())?;
///
/// let id = system.client.upload(r#"{"a": 1}"#.to_string()).await?;
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct DocumentSystem {
    /// Client for interacting with the Document actor
    pub client: StoreClient,

    /// Fires the worker's shutdown signal
    shutdown: oneshot::Sender<()>,

    /// The worker thread, which hands the final state back when it exits
    handle: JoinHandle<DocumentStore>,
}

impl DocumentSystem {
    /// Creates the Document actor and starts its worker thread; the client reports ready
    /// once the thread is running.
    pub fn new(options: &StoreOptions) -> std::io::Result<Self> {
        let (actor, client) = document_actor::new(options);
        let (shutdown, signal) = oneshot::channel();
        let handle = actor.spawn(signal)?;
        client.set_ready(true);
        info!(
            mailbox_capacity = options.mailbox_capacity,
            max_sleep_ms = options.max_sleep.as_millis() as u64,
            "Document system started"
        );

        Ok(Self {
            client,
            shutdown,
            handle,
        })
    }

    /// Gracefully shuts down the worker.
    ///
    /// Readiness drops before the signal is sent. The shutdown signal stops the loop after the action in progress; anything still
    /// queued is dropped and its caller sees a communication error. Waiting for the
    /// thread happens off the async runtime.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the worker exited cleanly
    /// - `Err(String)` if the worker thread panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        self.client.set_ready(false);

        // The worker may already be gone if every client was dropped.
        let _ = self.shutdown.send(());
        drop(self.client);

        let handle = self.handle;
        let joined = tokio::task::spawn_blocking(move || handle.join())
            .await
            .map_err(|e| format!("Worker join task failed: {e:?}"))?;

        match joined {
            Ok(store) => {
                info!(documents = store.len(), "System shutdown complete.");
                Ok(())
            }
            Err(e) => {
                error!("Worker thread panicked: {:?}", e);
                Err(format!("Worker thread panicked: {e:?}"))
            }
        }
    }
}
