use dashmap::DashMap;
use docstore_application::{ApplicationError, DocumentRepository, DocumentManager};
use docstore_domain::{Document, DocumentId, SearchRequest};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Concurrent in-memory document store.
///
/// Cloning is cheap and clones share the same underlying map. Writes to a
/// single id are serialised by the map's shard locks; searches see every
/// entry either before or after a concurrent write to it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    // Document ID -> Document
    store: Arc<DashMap<DocumentId, Arc<Document>>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Pre-sizes the map for roughly `capacity` documents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    /// Wires a [`DocumentManager`] to a fresh in-memory repository.
    pub fn manager() -> DocumentManager {
        DocumentManager::new(Arc::new(Self::new()))
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document))]
    fn save(&self, document: &Document) -> Result<(), ApplicationError> {
        debug!(doc_id = %document.id(), "Saving document to in-memory store");
        // Full overwrite, last write wins
        self.store
            .insert(document.id().clone(), Arc::new(document.clone()));
        Ok(())
    }

    #[instrument(skip(self))]
    fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
        debug!(doc_id = %id, "Getting document from in-memory store");
        let doc = self.store.get(id).map(|doc_ref| (**doc_ref).clone());
        Ok(doc)
    }

    #[instrument(skip(self, request))]
    fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        if request.is_unconstrained() {
            trace!("No search criteria provided, returning every document.");
        }
        let hits: Vec<Document> = self
            .store
            .iter()
            .filter(|entry| request.matches(entry.value()))
            .map(|entry| (**entry.value()).clone())
            .collect();
        debug!(
            scanned = self.store.len(),
            hits = hits.len(),
            "In-memory search finished."
        );
        Ok(hits)
    }

    fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.store.len())
    }
}
