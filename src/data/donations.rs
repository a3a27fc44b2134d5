use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::models::{Donation, DonationStatus};
use crate::store::{DocumentStore, Query, StoreError};

use super::{collections, decode, encode};

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewDonation {
    pub donor_id: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub message: Option<String>,
    pub issue_id: Option<String>,
}

/// Donations are immutable once recorded; the only correction allowed is a
/// status change by an administrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DonationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DonationStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DonationFilter {
    pub donor_id: Option<String>,
    pub issue_id: Option<String>,
    pub status: Option<DonationStatus>,
    pub limit: Option<usize>,
}

pub async fn create_donation(
    store: &dyn DocumentStore,
    input: NewDonation,
) -> Result<Donation, StoreError> {
    let mut fields = encode(&input)?;
    fields.insert("status".to_string(), json!(DonationStatus::Pending));
    let doc = store
        .add(collections::DONATIONS, None, fields)
        .await
        .inspect_err(|e| error!(error = %e, "failed to create donation"))?;
    decode(doc)
}

pub async fn update_donation(
    store: &dyn DocumentStore,
    id: &str,
    patch: DonationPatch,
) -> Result<Donation, StoreError> {
    let fields = encode(&patch)?;
    let doc = store
        .update(collections::DONATIONS, id, fields)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to update donation"))?;
    decode(doc)
}

pub async fn delete_donation(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store
        .delete(collections::DONATIONS, id)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to delete donation"))
}

pub async fn get_donation(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Donation>, StoreError> {
    let doc = store
        .get(collections::DONATIONS, id)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to fetch donation"))?;
    doc.map(decode).transpose()
}

pub async fn list_donations(
    store: &dyn DocumentStore,
    filter: DonationFilter,
) -> Result<Vec<Donation>, StoreError> {
    let mut query = Query::new();
    if let Some(donor_id) = filter.donor_id {
        query = query.filter("donor_id", donor_id);
    }
    if let Some(issue_id) = filter.issue_id {
        query = query.filter("issue_id", issue_id);
    }
    if let Some(status) = filter.status {
        query = query.filter("status", json!(status));
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    let docs = store
        .query(collections::DONATIONS, query)
        .await
        .inspect_err(|e| error!(error = %e, "failed to list donations"))?;
    docs.into_iter().map(decode).collect()
}
