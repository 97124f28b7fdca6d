//! Request and response envelopes for the document endpoints.
//!
//! Field names are camelCase on the wire; the capitalized spellings used by older
//! clients are accepted as aliases on requests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::document::{Document, DocumentId};
use crate::search::Path;

// upload

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentRequest {
    #[serde(alias = "Document")]
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentResponse {
    pub document_id: DocumentId,
}

// fetch single document

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDocumentRequest {
    pub document_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDocumentResponse {
    pub document: Document,
}

// fetch all documents

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAllDocumentsResponse {
    pub documents: HashMap<DocumentId, Document>,
}

// find documents

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindDocumentsRequest {
    #[serde(alias = "Key")]
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindDocumentsResponseItem {
    pub document_id: DocumentId,
    pub paths: Vec<Path>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindDocumentsResponse {
    pub matches: Vec<FindDocumentsResponseItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_request_accepts_legacy_field_name() {
        let req: UploadDocumentRequest = serde_json::from_str(r#"{"Document": "{}"}"#).unwrap();
        assert_eq!(req.document, "{}");
        let req: UploadDocumentRequest = serde_json::from_str(r#"{"document": "[]"}"#).unwrap();
        assert_eq!(req.document, "[]");
    }

    #[test]
    fn test_find_request_requires_key() {
        assert!(serde_json::from_str::<FindDocumentsRequest>("{}").is_err());
    }
}
