use chrono::Utc;
use docstore_domain::{Document, DocumentId, NewDocument, SearchRequest};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
    #[error("Repository {operation} failed: {source}")]
    RepositoryError {
        operation: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for storing, retrieving and filtering documents.
///
/// Implementations receive documents that already carry an id and a creation
/// timestamp; normalisation happens in [`DocumentManager`].
pub trait DocumentRepository: Send + Sync {
    /// Adds or fully replaces the document stored under its id.
    fn save(&self, document: &Document) -> Result<(), ApplicationError>;
    /// Retrieves a document by its ID.
    fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError>;
    /// Returns every stored document matching the request, in no particular order.
    fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError>;
    /// Returns the number of stored documents.
    fn count(&self) -> Result<usize, ApplicationError>;
}

// --- Application Services (Use Cases) ---

/// The document store facade: save, lookup by id and multi-criteria search.
pub struct DocumentManager {
    repo: Arc<dyn DocumentRepository>,
}

impl DocumentManager {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    /// Saves a document, generating an id and/or creation timestamp when the
    /// caller left them unset. A save with an existing id overwrites the
    /// previous version entirely.
    #[instrument(skip(self, document), fields(title = %document.title))]
    pub fn save(&self, document: NewDocument) -> Result<Document, ApplicationError> {
        let generated_id = document.id.is_none();
        let document = document.into_document(Utc::now());
        if generated_id {
            info!(doc_id = %document.id(), "Generated id for new document");
        }

        self.repo.save(&document).map_err(|e| {
            error!(doc_id = %document.id(), "Failed to save document to repository: {}", e);
            ApplicationError::RepositoryError {
                operation: "save",
                source: Box::new(e),
            }
        })?;
        debug!(doc_id = %document.id(), created = %document.created(), "Document saved");

        Ok(document)
    }

    #[instrument(skip(self, id))]
    pub fn find_by_id(
        &self,
        id: impl Into<DocumentId>,
    ) -> Result<Option<Document>, ApplicationError> {
        let id = id.into();
        let found = self.repo.get(&id).map_err(|e| {
            error!(doc_id = %id, "Failed to get document from repository: {}", e);
            ApplicationError::RepositoryError {
                operation: "get",
                source: Box::new(e),
            }
        })?;
        debug!(doc_id = %id, found = found.is_some(), "Lookup by id finished");
        Ok(found)
    }

    #[instrument(skip(self, request))]
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        let hits = self.repo.search(request).map_err(|e| {
            error!("Search failed: {}", e);
            ApplicationError::RepositoryError {
                operation: "search",
                source: Box::new(e),
            }
        })?;
        debug!(
            title_prefixes = request.title_prefixes.len(),
            contains_contents = request.contains_contents.len(),
            author_ids = request.author_ids.len(),
            has_date_range = request.created_from.is_some() || request.created_to.is_some(),
            hits = hits.len(),
            "Search finished"
        );
        Ok(hits)
    }

    pub fn count(&self) -> Result<usize, ApplicationError> {
        self.repo.count()
    }
}
