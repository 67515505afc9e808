use chrono::{DateTime, Utc}; // Creation timestamps
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Document ID ---
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)] // Serialized as a plain string
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: String) -> Self {
        Self(id)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id.to_string())
    }
}
impl From<DocumentId> for String {
    fn from(doc_id: DocumentId) -> Self {
        doc_id.0
    }
}
impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Author ---

/// The author a document is attributed to. Uniqueness of `id` is not enforced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    id: String,
    name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// --- Document ---

/// A stored content record. Every field is optional on input; the store assigns
/// `id` and `created` on first save when `id` is missing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Document {
    #[serde(default)]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    /// Set once at first save and never altered afterwards.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl Document {
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// Id of the author, if the document has one.
    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(Author::id)
    }
}

/// Fluent builder for [`Document`]. Unset fields stay `None`.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn id(mut self, id: impl Into<DocumentId>) -> Self {
        self.document.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.document.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.document.content = Some(content.into());
        self
    }

    pub fn author(mut self, author: Author) -> Self {
        self.document.author = Some(author);
        self
    }

    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.document.created = Some(created);
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}

// --- Search Request ---

/// Filter specification for a search. Criteria are AND-ed together; the values
/// inside one list criterion are OR-ed. A `None` or empty criterion matches
/// every document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SearchRequest {
    #[serde(default)]
    pub title_prefixes: Option<Vec<String>>,
    #[serde(default)]
    pub contains_contents: Option<Vec<String>>,
    #[serde(default)]
    pub author_ids: Option<Vec<String>>,
    /// Inclusive lower bound on `created`.
    #[serde(default)]
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created`.
    #[serde(default)]
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::default()
    }

    /// True when the document passes every criterion.
    pub fn matches(&self, doc: &Document) -> bool {
        self.matches_title(doc)
            && self.matches_content(doc)
            && self.matches_author(doc)
            && self.matches_created(doc)
    }

    pub fn matches_title(&self, doc: &Document) -> bool {
        match active(&self.title_prefixes) {
            None => true,
            Some(prefixes) => doc
                .title
                .as_deref()
                .is_some_and(|title| prefixes.iter().any(|p| title.starts_with(p.as_str()))),
        }
    }

    pub fn matches_content(&self, doc: &Document) -> bool {
        match active(&self.contains_contents) {
            None => true,
            Some(needles) => doc
                .content
                .as_deref()
                .is_some_and(|content| needles.iter().any(|n| content.contains(n.as_str()))),
        }
    }

    pub fn matches_author(&self, doc: &Document) -> bool {
        match active(&self.author_ids) {
            None => true,
            Some(ids) => doc
                .author_id()
                .is_some_and(|author_id| ids.iter().any(|id| id == author_id)),
        }
    }

    /// A document without `created` fails any bound that is set.
    pub fn matches_created(&self, doc: &Document) -> bool {
        let after_from = match self.created_from {
            None => true,
            Some(from) => doc.created.is_some_and(|created| created >= from),
        };
        let before_to = match self.created_to {
            None => true,
            Some(to) => doc.created.is_some_and(|created| created <= to),
        };
        after_from && before_to
    }
}

/// Treats a missing list and an empty list alike: no filtering.
fn active(values: &Option<Vec<String>>) -> Option<&[String]> {
    values.as_deref().filter(|v| !v.is_empty())
}

/// Fluent builder for [`SearchRequest`].
#[derive(Debug, Default)]
pub struct SearchRequestBuilder {
    request: SearchRequest,
}

impl SearchRequestBuilder {
    pub fn title_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.title_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn contains_contents<I, S>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.contains_contents = Some(needles.into_iter().map(Into::into).collect());
        self
    }

    pub fn author_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.author_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn created_from(mut self, from: DateTime<Utc>) -> Self {
        self.request.created_from = Some(from);
        self
    }

    pub fn created_to(mut self, to: DateTime<Utc>) -> Self {
        self.request.created_to = Some(to);
        self
    }

    pub fn build(self) -> SearchRequest {
        self.request
    }
}
