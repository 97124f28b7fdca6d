//! Generic single-writer actor framework.
//!
//! This module provides the building blocks for actors whose whole state is owned by one
//! worker and reached only through a bounded mailbox.
//!
//! # Main Components
//!
//! - [`Action`] - A named closure executed exclusively against the actor's state
//! - [`MailboxActor`] - The worker loop that owns the state
//! - [`MailboxClient`] - The handle that submits actions with non-blocking admission control
//! - [`FrameworkError`] - Transport errors
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning a worker.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
