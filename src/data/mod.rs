pub mod donations;
pub mod issues;
pub mod orphanages;
pub mod success_stories;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::store::{Document, Fields, StoreError};

pub mod collections {
    pub const ISSUES: &str = "issues";
    pub const DONATIONS: &str = "donations";
    pub const ORPHANAGES: &str = "orphanages";
    pub const SUCCESS_STORIES: &str = "success_stories";
}

/// Serialize a domain value into store fields, keeping the store-owned id
/// and timestamps out of the field map.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(mut fields)) => {
            fields.remove("id");
            fields.remove("created_at");
            fields.remove("updated_at");
            Ok(fields)
        }
        Ok(_) => Err(StoreError::Unknown("expected a JSON object".to_string())),
        Err(e) => Err(StoreError::Unknown(e.to_string())),
    }
}

/// Rehydrate a domain record from a document, folding the store-owned id
/// and timestamps back into the field map.
pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    let mut fields = doc.fields;
    fields.insert("id".to_string(), Value::String(doc.id));
    fields.insert(
        "created_at".to_string(),
        serde_json::to_value(doc.created_at).map_err(|e| StoreError::Unknown(e.to_string()))?,
    );
    fields.insert(
        "updated_at".to_string(),
        serde_json::to_value(doc.updated_at).map_err(|e| StoreError::Unknown(e.to_string()))?,
    );
    serde_json::from_value(Value::Object(fields)).map_err(|e| StoreError::Unknown(e.to_string()))
}
