//! HTTP surface: a small per-route dispatcher in front of a [`Responder`].
//!
//! Each [`Route`] declares its maximum body size and an ordered list of method
//! handlers. [`dispatch`] enforces the size limit, reads the body, opens the request
//! span, picks the handler, bounds it by the request deadline and maps the outcome to
//! a response.

pub mod dispatch;
pub mod error;
pub mod responder;
pub mod routes;

pub use dispatch::*;
pub use error::*;
pub use responder::*;
pub use routes::*;
