pub mod error;
pub mod memory;
pub mod sql;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sql::SqlStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub type Fields = Map<String, Value>;

/// A single record in a collection. The id and both timestamps are owned by
/// the store and set server-side on write.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields: Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Equality-filter query against one collection: filters are AND-ed,
/// ordering is by creation time, the limit applies after filtering.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order: Order,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn oldest_first(mut self) -> Self {
        self.order = Order::OldestFirst;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn matches(&self, fields: &Fields) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| fields.get(field) == Some(value))
    }
}

/// Collection-scoped document store. Injected as a trait object so the same
/// accessors and jobs run against the SQL backend, the in-memory backend,
/// and test doubles.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document. When `id` is `None` the store assigns a UUID.
    /// Writing an id that already exists overwrites the stored fields.
    async fn add(
        &self,
        collection: &str,
        id: Option<String>,
        fields: Fields,
    ) -> Result<Document, StoreError>;

    /// Shallow-merge `patch` into an existing document and bump `updated_at`.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Fields,
    ) -> Result<Document, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError>;
}
