// Document store abstraction over named collections of schema-less JSON documents

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

pub use memory::InMemoryStore;
pub use postgres::PgDocumentStore;

/// A schema-less JSON object as stored in a collection
pub type Document = Map<String, Value>;

/// Field/value pairs a document must contain to match; empty matches everything
pub type Filter = Map<String, Value>;

/// Key under which a document's identifier is exposed
pub const ID_FIELD: &str = "_id";

/// The collections this service reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Bookings,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Services, Collection::Bookings];

    /// Table / collection name
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Bookings => "bookings",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid document id: {0}")]
    InvalidId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Storage operations the HTTP handlers rely on.
///
/// Identifiers are UUID strings; anything else fails with
/// [`StoreError::InvalidId`]. Returned documents always carry `_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents containing every pair in `filter`, in insertion order
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;

    /// Stores `document` under a fresh identifier; a client-supplied `_id` is dropped
    async fn insert_one(&self, collection: Collection, document: Document) -> Result<InsertAck, StoreError>;

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<DeleteAck, StoreError>;

    /// Sets the given top-level fields, leaving the rest of the document alone
    async fn update_fields(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<UpdateAck, StoreError>;
}

pub(crate) fn parse_id(id: &str) -> Result<uuid::Uuid, StoreError> {
    uuid::Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Attach the identifier to a stored body
pub(crate) fn with_id(id: uuid::Uuid, mut body: Document) -> Document {
    body.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    body
}

/// True when every filter pair is present in `document`
pub(crate) fn matches(document: &Document, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}
