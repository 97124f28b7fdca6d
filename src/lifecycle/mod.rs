//! Process wiring: configuration, logging, metrics and the worker's lifecycle.

pub mod config;
pub mod document_system;
pub mod metrics;
pub mod tracing;

pub use self::config::*;
pub use document_system::*;
pub use self::metrics::*;
pub use self::tracing::*;
