use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// --- Document ID ---
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh random identifier (version-4 UUID, hyphenated).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
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

/// The creator of a document. Embedded by value; has no lifecycle of its own.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Author {
    /// Identifier assigned by the caller.
    pub id: String,
    pub name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// --- Documents ---

/// Input to a save: `id` and `created` may be left unset and are filled in
/// by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewDocument {
    #[serde(default)]
    pub id: Option<DocumentId>,
    pub title: String,
    pub content: String,
    pub author: Author,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl NewDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author,
            created: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Produces the stored form. A missing id is generated, a missing
    /// timestamp becomes `now`; every other field is moved over unchanged.
    pub fn into_document(self, now: DateTime<Utc>) -> Document {
        Document {
            id: self.id.unwrap_or_else(DocumentId::generate),
            title: self.title,
            content: self.content,
            author: self.author,
            created: self.created.unwrap_or(now),
        }
    }
}

/// A stored document. Always carries an id and a creation timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    id: DocumentId,
    title: String,
    content: String,
    author: Author,
    created: DateTime<Utc>,
}

impl Document {
    pub fn new(
        id: DocumentId,
        title: String,
        content: String,
        author: Author,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            content,
            author,
            created,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl From<Document> for NewDocument {
    fn from(doc: Document) -> Self {
        Self {
            id: Some(doc.id),
            title: doc.title,
            content: doc.content,
            author: doc.author,
            created: Some(doc.created),
        }
    }
}

// --- Search Request ---

/// Multi-criteria filter. Every dimension left empty (or `None`) matches
/// everything; the active dimensions are combined with AND.
///
/// Note the per-dimension semantics: `title_prefixes` and `author_ids` match
/// when ANY entry matches, while `contains_contents` requires ALL entries to
/// be present in the content.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    #[serde(default)]
    pub title_prefixes: Vec<String>,
    #[serde(default)]
    pub contains_contents: Vec<String>,
    #[serde(default)]
    pub author_ids: Vec<String>,
    /// Inclusive lower bound on `created`.
    #[serde(default)]
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created`.
    #[serde(default)]
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_contains_contents<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains_contents = contents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_author_ids<I, S>(mut self, author_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_ids = author_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn with_created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    /// True when no dimension constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.title_prefixes.is_empty()
            && self.contains_contents.is_empty()
            && self.author_ids.is_empty()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }

    /// Checks a document against every active dimension.
    pub fn matches(&self, doc: &Document) -> bool {
        self.matches_title_prefixes(doc)
            && self.matches_contains_contents(doc)
            && self.matches_author_ids(doc)
            && self.is_within_date_range(doc)
    }

    fn matches_title_prefixes(&self, doc: &Document) -> bool {
        self.title_prefixes.is_empty()
            || self
                .title_prefixes
                .iter()
                .any(|prefix| doc.title().starts_with(prefix.as_str()))
    }

    // ALL substrings must be present, unlike the prefix and author checks.
    fn matches_contains_contents(&self, doc: &Document) -> bool {
        self.contains_contents
            .iter()
            .all(|needle| doc.content().contains(needle.as_str()))
    }

    fn matches_author_ids(&self, doc: &Document) -> bool {
        self.author_ids.is_empty() || self.author_ids.iter().any(|id| *id == doc.author().id)
    }

    fn is_within_date_range(&self, doc: &Document) -> bool {
        let created = doc.created();
        self.created_from.is_none_or(|from| created >= from)
            && self.created_to.is_none_or(|to| created <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn java_doc() -> Document {
        Document::new(
            DocumentId::from("doc-java"),
            "Java Programming".to_string(),
            "Java is a popular programming language".to_string(),
            Author::new("1", "John Doe"),
            ts(2023, 1, 1),
        )
    }

    #[test]
    fn generated_ids_are_distinct_uuids() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn into_document_fills_missing_id_and_created() {
        let now = ts(2024, 5, 6);
        let doc = NewDocument::new("Title", "Body", Author::new("1", "John Doe")).into_document(now);
        assert!(!doc.id().as_str().is_empty());
        assert_eq!(doc.created(), now);
        assert_eq!(doc.title(), "Title");
        assert_eq!(doc.content(), "Body");
        assert_eq!(doc.author(), &Author::new("1", "John Doe"));
    }

    #[test]
    fn into_document_keeps_explicit_id_and_created() {
        let created = ts(2020, 1, 1);
        let doc = NewDocument::new("Title", "Body", Author::new("1", "John Doe"))
            .with_id("existing-id")
            .with_created(created)
            .into_document(ts(2024, 5, 6));
        assert_eq!(doc.id().as_str(), "existing-id");
        assert_eq!(doc.created(), created);
    }

    #[test]
    fn default_request_matches_everything() {
        let request = SearchRequest::default();
        assert!(request.is_unconstrained());
        assert!(request.matches(&java_doc()));
    }

    #[test]
    fn title_prefixes_match_any_and_are_case_sensitive() {
        let doc = java_doc();
        assert!(SearchRequest::new().with_title_prefixes(["C++", "Java"]).matches(&doc));
        assert!(!SearchRequest::new().with_title_prefixes(["java"]).matches(&doc));
        assert!(!SearchRequest::new().with_title_prefixes(["Programming"]).matches(&doc));
    }

    #[test]
    fn contains_contents_requires_every_substring() {
        let doc = java_doc();
        assert!(SearchRequest::new().with_contains_contents(["Java", "popular"]).matches(&doc));
        assert!(!SearchRequest::new().with_contains_contents(["Java", "easy"]).matches(&doc));
    }

    #[test]
    fn author_ids_match_any_listed_author() {
        let doc = java_doc();
        assert!(SearchRequest::new().with_author_ids(["2", "1"]).matches(&doc));
        assert!(!SearchRequest::new().with_author_ids(["2"]).matches(&doc));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let doc = java_doc();
        let exact = ts(2023, 1, 1);
        assert!(
            SearchRequest::new()
                .with_created_from(exact)
                .with_created_to(exact)
                .matches(&doc)
        );
        assert!(!SearchRequest::new().with_created_from(ts(2023, 1, 2)).matches(&doc));
        assert!(!SearchRequest::new().with_created_to(ts(2022, 12, 31)).matches(&doc));
    }

    #[test]
    fn inverted_date_range_matches_nothing() {
        let request = SearchRequest::new()
            .with_created_from(ts(2024, 1, 1))
            .with_created_to(ts(2022, 1, 1));
        assert!(!request.matches(&java_doc()));
    }

    #[test]
    fn search_request_deserializes_with_missing_fields() {
        let request: SearchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, SearchRequest::default());

        let request: SearchRequest = serde_json::from_str(
            r#"{"title_prefixes": ["Java"], "created_to": "2023-12-31T23:59:59Z"}"#,
        )
        .unwrap();
        assert_eq!(request.title_prefixes, vec!["Java".to_string()]);
        assert_eq!(
            request.created_to,
            Some(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap())
        );
    }

    #[test]
    fn new_document_deserializes_without_id_and_created() {
        let doc: NewDocument = serde_json::from_str(
            r#"{"title": "T", "content": "C", "author": {"id": "1", "name": "John Doe"}}"#,
        )
        .unwrap();
        assert!(doc.id.is_none());
        assert!(doc.created.is_none());
        assert_eq!(doc.author.id, "1");
    }
}
