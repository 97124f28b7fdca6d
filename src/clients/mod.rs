//! Type-safe wrappers around [`MailboxClient`](crate::framework::MailboxClient).

pub mod actor_client;
pub mod store_client;

pub use actor_client::*;
pub use store_client::*;
