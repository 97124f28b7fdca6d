use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use uuid::Uuid;

use super::parse::parse;

/// Type-safe identifier for Documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored document.
///
/// The raw text is kept verbatim. If it parsed, `parsed` holds the structure and
/// `error` is `None`; otherwise `parsed` is `None` and `error` holds the diagnostic.
/// Documents are never modified once stored; readers always receive clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub raw: String,
    pub parsed: Option<Value>,
    pub error: Option<String>,
}

impl Document {
    /// Builds a document from submitted text, recording a parse failure instead of
    /// rejecting it.
    pub fn from_raw(id: DocumentId, raw: String) -> Self {
        match parse(&raw) {
            Ok(value) => Self {
                id,
                raw,
                parsed: Some(value),
                error: None,
            },
            Err(e) => Self {
                id,
                raw,
                parsed: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_valid() {
        let doc = Document::from_raw(DocumentId::new_v4(), "{}".to_string());
        assert_eq!(doc.raw, "{}");
        assert_eq!(doc.parsed, Some(json!({})));
        assert!(doc.error.is_none());
    }

    #[test]
    fn test_from_raw_malformed() {
        let doc = Document::from_raw(DocumentId::new_v4(), "not json".to_string());
        assert_eq!(doc.raw, "not json");
        assert!(doc.parsed.is_none());
        assert!(doc.error.as_deref().is_some_and(|e| !e.is_empty()));
    }

    #[test]
    fn test_serializes_camel_case_with_string_id() {
        let id = DocumentId(Uuid::nil());
        let doc = Document::from_raw(id, "[1]".to_string());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["id"], json!("00000000-0000-0000-0000-000000000000"));
        assert_eq!(value["parsed"], json!([1]));
        assert_eq!(value["error"], Value::Null);
    }
}
