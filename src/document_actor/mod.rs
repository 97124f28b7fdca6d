//! Document-specific actor state, health flags and error type.

pub mod error;
pub mod health;
pub mod store;

pub use error::*;
pub use health::*;
pub use store::*;

use crate::clients::StoreClient;
use crate::framework::MailboxActor;
use std::sync::Arc;
use std::time::Duration;

/// Tunables for the Document actor.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Actions allowed to wait while one executes.
    pub mailbox_capacity: usize,
    /// Upper bound accepted by the sleep hook.
    pub max_sleep: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1,
            max_sleep: Duration::from_millis(5000),
        }
    }
}

/// Creates a new Document actor and its client.
pub fn new(options: &StoreOptions) -> (MailboxActor<DocumentStore>, StoreClient) {
    let (actor, inner) = MailboxActor::new(DocumentStore::default(), options.mailbox_capacity);
    let client = StoreClient::new(inner, Arc::new(Health::default()), options.max_sleep);
    (actor, client)
}
