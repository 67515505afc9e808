use domain::{Document, SearchRequest};
use tracing::trace;

/// Linear scan over `documents`, keeping the ones the request accepts.
/// WARNING: no index, every search touches every document.
pub fn filter_documents<'a, I>(documents: I, request: &SearchRequest) -> Vec<Document>
where
    I: IntoIterator<Item = &'a Document>,
{
    documents
        .into_iter()
        .filter(|doc| check_doc_matches_request(doc, request))
        .cloned()
        .collect()
}

/// Checks each criterion in turn, stopping at the first one that fails.
fn check_doc_matches_request(doc: &Document, request: &SearchRequest) -> bool {
    let doc_id = doc.id.as_ref().map(|id| id.as_str()).unwrap_or("<none>");

    if !request.matches_title(doc) {
        trace!(doc_id, "Title prefix condition not met, skipping doc.");
        return false;
    }
    if !request.matches_content(doc) {
        trace!(doc_id, "Content condition not met, skipping doc.");
        return false;
    }
    if !request.matches_author(doc) {
        trace!(doc_id, "Author condition not met, skipping doc.");
        return false;
    }
    if !request.matches_created(doc) {
        trace!(doc_id, "Created range condition not met, skipping doc.");
        return false;
    }

    trace!(doc_id, "All search conditions met.");
    true
}
