use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::models::SuccessStory;
use crate::store::{DocumentStore, Query, StoreError};

use super::{collections, decode, encode};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewSuccessStory {
    pub orphanage_id: String,
    pub orphanage_name: String,
    pub issue_id: Option<String>,
    pub issue_title: Option<String>,
    pub title: String,
    pub description: String,
    pub impact: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub beneficiaries: u32,
    pub cost: f64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SuccessStoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiaries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StoryFilter {
    pub orphanage_id: Option<String>,
    pub issue_id: Option<String>,
    pub limit: Option<usize>,
}

/// `id` may be supplied by the caller; the derivation pipeline passes a
/// deterministic id so concurrent creates collapse to overwrites.
pub async fn create_success_story(
    store: &dyn DocumentStore,
    id: Option<String>,
    input: NewSuccessStory,
) -> Result<SuccessStory, StoreError> {
    let fields = encode(&input)?;
    let doc = store
        .add(collections::SUCCESS_STORIES, id, fields)
        .await
        .inspect_err(|e| error!(error = %e, "failed to create success story"))?;
    decode(doc)
}

pub async fn update_success_story(
    store: &dyn DocumentStore,
    id: &str,
    patch: SuccessStoryPatch,
) -> Result<SuccessStory, StoreError> {
    let fields = encode(&patch)?;
    let doc = store
        .update(collections::SUCCESS_STORIES, id, fields)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to update success story"))?;
    decode(doc)
}

pub async fn delete_success_story(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store
        .delete(collections::SUCCESS_STORIES, id)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to delete success story"))
}

pub async fn get_success_story(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<SuccessStory>, StoreError> {
    let doc = store
        .get(collections::SUCCESS_STORIES, id)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to fetch success story"))?;
    doc.map(decode).transpose()
}

pub async fn list_success_stories(
    store: &dyn DocumentStore,
    filter: StoryFilter,
) -> Result<Vec<SuccessStory>, StoreError> {
    let mut query = Query::new();
    if let Some(orphanage_id) = filter.orphanage_id {
        query = query.filter("orphanage_id", orphanage_id);
    }
    if let Some(issue_id) = filter.issue_id {
        query = query.filter("issue_id", issue_id);
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    let docs = store
        .query(collections::SUCCESS_STORIES, query)
        .await
        .inspect_err(|e| error!(error = %e, "failed to list success stories"))?;
    docs.into_iter().map(decode).collect()
}
