//! Error types for the Document actor.

use thiserror::Error;

use crate::framework::FrameworkError;
use crate::model::DocumentId;

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The supplied document id is empty or not a UUID.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// The requested sleep duration is outside the allowed bound.
    #[error("milliseconds '{requested}' out of range (1-{max})")]
    InvalidDuration { requested: i64, max: u64 },

    /// The requested document was not found.
    #[error("document {0} not found")]
    NotFound(String),

    /// The id generator produced an id that is already stored.
    #[error("cannot create doc with id {0}: id already found")]
    IdCollision(DocumentId),

    /// The mailbox is full. Retry later.
    #[error("service unavailable")]
    ServiceUnavailable,

    /// An error occurred while communicating with the actor.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for StoreError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::ServiceUnavailable => StoreError::ServiceUnavailable,
            other => StoreError::ActorCommunicationError(other.to_string()),
        }
    }
}
