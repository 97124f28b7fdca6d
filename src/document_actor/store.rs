//! The state owned by the Document actor.
//!
//! Everything here is synchronous and lock-free: a [`DocumentStore`] is only ever
//! touched by the worker that owns it, one action at a time.

use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info, trace};

use super::error::StoreError;
use crate::model::{Document, DocumentId, FindDocumentsResponseItem};
use crate::search::search;

pub struct DocumentStore {
    documents: HashMap<DocumentId, Document>,
    next_id_fn: Box<dyn Fn() -> DocumentId + Send>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(DocumentId::new_v4)
    }
}

impl DocumentStore {
    pub fn new(next_id_fn: impl Fn() -> DocumentId + Send + 'static) -> Self {
        Self {
            documents: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Stores `raw` under a fresh id. Malformed text is stored with its diagnostic.
    pub fn upload(&mut self, raw: String) -> Result<DocumentId, StoreError> {
        let id = (self.next_id_fn)();
        if self.documents.contains_key(&id) {
            return Err(StoreError::IdCollision(id));
        }

        debug!(%id, len = raw.len(), "attempting to parse document");
        trace!(%id, raw = %raw, "document text");

        let document = Document::from_raw(id, raw);
        if let Some(error) = &document.error {
            debug!(%id, error = %error, "stored unparseable document");
        }
        self.documents.insert(id, document);
        info!(%id, size = self.documents.len(), "Created");
        Ok(id)
    }

    pub fn fetch(&self, id: &DocumentId) -> Result<Document, StoreError> {
        let found = self.documents.get(id).cloned();
        debug!(%id, found = found.is_some(), "Get");
        found.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// An independent copy of every stored document.
    pub fn fetch_all(&self) -> HashMap<DocumentId, Document> {
        self.documents.clone()
    }

    /// Documents containing `key`, ordered by id. Documents that failed to parse are skipped.
    pub fn find(&self, key: &str) -> Vec<FindDocumentsResponseItem> {
        let mut matches: Vec<FindDocumentsResponseItem> = self
            .documents
            .values()
            .filter_map(|doc| {
                let parsed = doc.parsed.as_ref()?;
                debug!(id = %doc.id, key, "looking for key");
                let paths = search(parsed, &[], key);
                (!paths.is_empty()).then(|| FindDocumentsResponseItem {
                    document_id: doc.id,
                    paths,
                })
            })
            .collect();
        matches.sort_by_key(|m| m.document_id);
        matches
    }

    /// The whole document map as JSON.
    pub fn dump(&self) -> Value {
        json!(self.documents)
    }
}
