// ./infrastructure/src/persistence/in_memory_repository.rs
use crate::search::filter_documents;
use application::DocumentRepository;
use domain::{Document, DocumentId, SearchRequest};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Single-threaded in-memory store. Callers sharing it across threads must
/// wrap it in their own lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    // Document ID -> Document
    store: HashMap<DocumentId, Document>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document))]
    fn save(&mut self, id: &DocumentId, document: &Document) {
        debug!(doc_id = %id, "Saving document to in-memory store");
        if self.store.insert(id.clone(), document.clone()).is_some() {
            debug!(doc_id = %id, "Replaced existing document");
        }
    }

    #[instrument(skip(self))]
    fn get(&self, id: &DocumentId) -> Option<Document> {
        debug!(doc_id = %id, "Getting document from in-memory store");
        self.store.get(id).cloned()
    }

    #[instrument(skip(self, request))]
    fn search(&self, request: &SearchRequest) -> Vec<Document> {
        debug!(count = self.store.len(), "Searching in-memory store");
        let hits = filter_documents(self.store.values(), request);
        debug!(hits = hits.len(), "In-memory search finished.");
        hits
    }

    fn count(&self) -> usize {
        self.store.len()
    }
}
