//! The parser boundary.
//!
//! Uploads are stored first and validated lazily, so the store only needs a function
//! that turns text into either a structure or a diagnostic. `serde_json` does the work.

use serde_json::Value;
use thiserror::Error;

/// Why a document's text could not be parsed. Carries `serde_json`'s message,
/// including line and column.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);

/// Parses `text` as JSON. Exactly one of the value or the diagnostic is produced.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError(e.to_string()))
}
