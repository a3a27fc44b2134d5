use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::models::Orphanage;
use crate::store::{DocumentStore, Query, StoreError};

use super::{collections, decode, encode};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewOrphanage {
    pub name: String,
    pub city: String,
    pub country: String,
    pub address: Option<String>,
    pub children_count: u32,
    pub staff_count: u32,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OrphanagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_count: Option<u32>,
    /// Only administrators flip this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrphanageFilter {
    pub verified: Option<bool>,
    pub country: Option<String>,
    pub limit: Option<usize>,
}

pub async fn create_orphanage(
    store: &dyn DocumentStore,
    input: NewOrphanage,
) -> Result<Orphanage, StoreError> {
    let mut fields = encode(&input)?;
    // Registrations start unverified; an admin review flips the flag.
    fields.insert("verified".to_string(), json!(false));
    let doc = store
        .add(collections::ORPHANAGES, None, fields)
        .await
        .inspect_err(|e| error!(error = %e, "failed to create orphanage"))?;
    decode(doc)
}

pub async fn update_orphanage(
    store: &dyn DocumentStore,
    id: &str,
    patch: OrphanagePatch,
) -> Result<Orphanage, StoreError> {
    let fields = encode(&patch)?;
    let doc = store
        .update(collections::ORPHANAGES, id, fields)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to update orphanage"))?;
    decode(doc)
}

pub async fn delete_orphanage(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store
        .delete(collections::ORPHANAGES, id)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to delete orphanage"))
}

pub async fn get_orphanage(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Orphanage>, StoreError> {
    let doc = store
        .get(collections::ORPHANAGES, id)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to fetch orphanage"))?;
    doc.map(decode).transpose()
}

pub async fn list_orphanages(
    store: &dyn DocumentStore,
    filter: OrphanageFilter,
) -> Result<Vec<Orphanage>, StoreError> {
    let mut query = Query::new();
    if let Some(verified) = filter.verified {
        query = query.filter("verified", verified);
    }
    if let Some(country) = filter.country {
        query = query.filter("country", country);
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    let docs = store
        .query(collections::ORPHANAGES, query)
        .await
        .inspect_err(|e| error!(error = %e, "failed to list orphanages"))?;
    docs.into_iter().map(decode).collect()
}
