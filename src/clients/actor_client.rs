use crate::framework::{FrameworkError, MailboxClient};
use async_trait::async_trait;

/// Trait for actor-specific clients to inherit the standard submission path.
///
/// This trait reduces boilerplate by providing a default implementation of
/// `perform`, which queues a closure and folds transport errors into the
/// client's own error type.
#[async_trait]
pub trait ActorClient<S: Send + 'static>: Send + Sync {
    /// The actor-specific error type.
    type Error: Send + Sync + 'static;

    /// Access the inner generic MailboxClient.
    fn inner(&self) -> &MailboxClient<S>;

    /// Map framework errors to the specific actor error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Run `work` with exclusive access to the actor's state.
    #[tracing::instrument(skip(self, work))]
    async fn perform<T, F>(&self, name: &'static str, work: F) -> Result<T, Self::Error>
    where
        F: FnOnce(&mut S) -> Result<T, Self::Error> + Send + 'static,
        T: Send + 'static,
    {
        tracing::debug!("Sending request");
        self.inner().submit(name, work).await.map_err(Self::map_error)?
    }
}
