use chrono::Utc;
use domain::{Document, DocumentId, SearchRequest};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for storing and retrieving documents.
///
/// Implementations are plain storage: the upsert rules (id generation,
/// preserving `created`) live in [`DocumentService`].
pub trait DocumentRepository {
    /// Inserts or replaces the document stored under `id`.
    fn save(&mut self, id: &DocumentId, document: &Document);
    /// Retrieves a document by its ID.
    fn get(&self, id: &DocumentId) -> Option<Document>;
    /// Returns every stored document accepted by the request, in no particular order.
    fn search(&self, request: &SearchRequest) -> Vec<Document>;
    /// Returns the number of stored documents.
    fn count(&self) -> usize;
}

// --- Application Services (Use Cases) ---

/// Service owning the document store. Construct one and pass it around by
/// reference; there is no process-wide instance.
pub struct DocumentService {
    repo: Box<dyn DocumentRepository>,
}

impl DocumentService {
    pub fn new(repo: Box<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    /// Upserts a document and returns it with `id` and `created` finalized.
    ///
    /// - No id: a random UUID is assigned and `created` is set to now.
    /// - Known id: the stored `created` wins over whatever the input carries.
    /// - Unknown caller-supplied id: stored as given, `created` included.
    #[instrument(skip(self, document), fields(doc_id = ?document.id))]
    pub fn save(&mut self, mut document: Document) -> Document {
        let id = match document.id.clone() {
            None => {
                let id = DocumentId::new(Uuid::new_v4().to_string());
                document.id = Some(id.clone());
                document.created = Some(Utc::now());
                info!(doc_id = %id, "Assigned id to new document");
                id
            }
            Some(id) => {
                if let Some(existing) = self.repo.get(&id) {
                    debug!(doc_id = %id, "Document exists, keeping original creation time");
                    document.created = existing.created;
                } else {
                    debug!(doc_id = %id, "Storing new document under caller-supplied id");
                }
                id
            }
        };

        self.repo.save(&id, &document);
        document
    }

    #[instrument(skip(self, request))]
    pub fn search(&self, request: &SearchRequest) -> Vec<Document> {
        let results = self.repo.search(request);
        debug!(hits = results.len(), "Search finished");
        results
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: &str) -> Option<Document> {
        let found = self.repo.get(&DocumentId::from(id));
        if found.is_none() {
            debug!(doc_id = %id, "Document not found");
        }
        found
    }

    /// Number of stored documents.
    pub fn count(&self) -> usize {
        self.repo.count()
    }
}

// --- Request/Response helpers ---

/// Parses a JSON search request. Absent keys leave their criterion unset.
pub fn parse_search_request(json: &str) -> Result<SearchRequest, ApplicationError> {
    serde_json::from_str(json).map_err(|e| {
        warn!("Rejected search request JSON: {}", e);
        ApplicationError::InvalidInput(format!("Malformed search request: {}", e))
    })
}

/// Renders documents as a pretty-printed JSON array.
pub fn render_documents(documents: &[Document]) -> Result<String, ApplicationError> {
    Ok(serde_json::to_string_pretty(documents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone};
    use domain::Author;
    use std::collections::HashMap;

    /// Minimal repository so the service rules can be tested on their own.
    #[derive(Default)]
    struct MapRepository {
        docs: HashMap<DocumentId, Document>,
    }

    impl DocumentRepository for MapRepository {
        fn save(&mut self, id: &DocumentId, document: &Document) {
            self.docs.insert(id.clone(), document.clone());
        }
        fn get(&self, id: &DocumentId) -> Option<Document> {
            self.docs.get(id).cloned()
        }
        fn search(&self, request: &SearchRequest) -> Vec<Document> {
            self.docs
                .values()
                .filter(|doc| request.matches(doc))
                .cloned()
                .collect()
        }
        fn count(&self) -> usize {
            self.docs.len()
        }
    }

    fn create_service() -> DocumentService {
        DocumentService::new(Box::new(MapRepository::default()))
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn save_assigns_id_and_created_to_new_document() {
        let mut service = create_service();
        let before = Utc::now();
        let saved = service.save(Document::builder().title("Document One").build());
        let after = Utc::now();

        let id = saved.id.clone().expect("id assigned");
        assert!(!id.as_str().is_empty());
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        let created = saved.created.expect("created assigned");
        assert!(created >= before && created <= after);
        assert_eq!(service.find_by_id(id.as_str()), Some(saved));
    }

    #[test]
    fn save_assigns_distinct_ids() {
        let mut service = create_service();
        let a = service.save(Document::default());
        let b = service.save(Document::default());
        assert_ne!(a.id, b.id);
        assert_eq!(service.count(), 2);
    }

    #[test]
    fn save_without_id_overrides_supplied_created() {
        let mut service = create_service();
        let saved = service.save(Document::builder().created(ts(5)).build());
        assert_ne!(saved.created, Some(ts(5)));
    }

    #[test]
    fn resave_keeps_original_created_and_replaces_fields() {
        let mut service = create_service();
        let first = service.save(Document::builder().title("Draft").build());
        let id = first.id.clone().unwrap();

        let update = Document::builder()
            .id(id.clone())
            .title("Final")
            .content("Body")
            .created(ts(42))
            .build();
        let second = service.save(update);

        assert_eq!(second.id, Some(id.clone()));
        assert_eq!(second.created, first.created);
        let stored = service.find_by_id(id.as_str()).unwrap();
        assert_eq!(stored.title.as_deref(), Some("Final"));
        assert_eq!(stored.content.as_deref(), Some("Body"));
        assert_eq!(stored.created, first.created);
        assert_eq!(service.count(), 1);
    }

    #[test]
    fn resave_without_created_keeps_original_created() {
        let mut service = create_service();
        let first = service.save(Document::default());
        let id = first.id.clone().unwrap();
        let second = service.save(Document::builder().id(id).build());
        assert_eq!(second.created, first.created);
    }

    #[test]
    fn caller_supplied_id_is_stored_as_is() {
        let mut service = create_service();
        let with_created = service.save(Document::builder().id("custom").created(ts(7)).build());
        assert_eq!(with_created.id, Some(DocumentId::from("custom")));
        assert_eq!(with_created.created, Some(ts(7)));

        let without_created = service.save(Document::builder().id("bare").build());
        assert!(without_created.created.is_none());
        assert!(service.find_by_id("bare").unwrap().created.is_none());
    }

    #[test]
    fn resave_of_undated_document_stays_undated() {
        let mut service = create_service();
        service.save(Document::builder().id("bare").build());
        let again = service.save(Document::builder().id("bare").created(ts(9)).build());
        assert!(again.created.is_none());
    }

    #[test]
    fn find_by_id_unknown_returns_none() {
        let service = create_service();
        assert!(service.find_by_id("missing").is_none());
    }

    #[test]
    fn search_with_future_created_from_is_empty() {
        let mut service = create_service();
        service.save(Document::builder().title("Document One").build());
        let request = SearchRequest::builder()
            .created_from(Utc::now() + Duration::days(1))
            .build();
        assert!(service.search(&request).is_empty());
    }

    #[test]
    fn search_combines_title_and_author() {
        let mut service = create_service();
        let first = service.save(
            Document::builder()
                .title("Document One")
                .author(Author::new("auth1", "John Doe"))
                .build(),
        );
        service.save(
            Document::builder()
                .title("Report B")
                .author(Author::new("auth2", "Jane Smith"))
                .build(),
        );

        let request = SearchRequest::builder()
            .title_prefixes(["Document"])
            .author_ids(["auth1"])
            .build();
        assert_eq!(service.search(&request), vec![first]);
    }

    #[test]
    fn parse_search_request_accepts_partial_json() {
        let request = parse_search_request(r#"{"author_ids": ["auth1"]}"#).unwrap();
        assert_eq!(request.author_ids, Some(vec!["auth1".to_string()]));
        assert!(request.title_prefixes.is_none());
        assert!(request.created_to.is_none());
    }

    #[test]
    fn parse_search_request_rejects_malformed_json() {
        let result = parse_search_request(r#"{"author_ids": "auth1""#);
        assert!(matches!(result, Err(ApplicationError::InvalidInput(msg)) if msg.contains("Malformed")));
    }

    #[test]
    fn render_documents_produces_json_array() {
        let doc = Document::builder().id("doc1").title("Document One").build();
        let rendered = render_documents(&[doc]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value[0]["id"], "doc1");
        assert_eq!(value[0]["title"], "Document One");
        assert!(value[0]["created"].is_null());
    }
}
