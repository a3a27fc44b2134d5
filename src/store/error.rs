use sea_orm::DbErr;
use thiserror::Error;

/// Store-boundary error taxonomy. Backend failures are classified here once
/// instead of at every call site.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("transient store failure: {0}")]
    Transient(String),

    #[error("store failure: {0}")]
    Unknown(String),
}

impl StoreError {
    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn from_db(err: DbErr) -> Self {
        match err {
            DbErr::Conn(e) => StoreError::Transient(e.to_string()),
            DbErr::ConnectionAcquire(e) => StoreError::Transient(e.to_string()),
            other => StoreError::Unknown(other.to_string()),
        }
    }
}
