//! Pure data structures: the stored [`Document`], the parser boundary, and the
//! request/response envelopes exchanged over HTTP.

pub mod api;
pub mod document;
pub mod parse;

pub use api::*;
pub use document::*;
pub use parse::*;
