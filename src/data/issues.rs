use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::models::{Issue, IssueCategory, IssueStatus, Priority};
use crate::store::{DocumentStore, Query, StoreError};

use super::{collections, decode, encode};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewIssue {
    pub orphanage_id: String,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub priority: Priority,
    pub estimated_cost: f64,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct IssuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<IssueCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raised_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IssueFilter {
    pub orphanage_id: Option<String>,
    pub status: Option<IssueStatus>,
    pub category: Option<IssueCategory>,
    pub limit: Option<usize>,
}

pub async fn create_issue(
    store: &dyn DocumentStore,
    input: NewIssue,
) -> Result<Issue, StoreError> {
    let mut fields = encode(&input)?;
    fields.insert("status".to_string(), json!(IssueStatus::Open));
    fields.insert("raised_amount".to_string(), json!(0.0));
    let doc = store
        .add(collections::ISSUES, None, fields)
        .await
        .inspect_err(|e| error!(error = %e, "failed to create issue"))?;
    decode(doc)
}

pub async fn update_issue(
    store: &dyn DocumentStore,
    id: &str,
    mut patch: IssuePatch,
) -> Result<Issue, StoreError> {
    // Marking an issue resolved stamps the resolution time unless the
    // caller provides one.
    if patch.status == Some(IssueStatus::Resolved) && patch.resolved_at.is_none() {
        patch.resolved_at = Some(Utc::now());
    }
    let fields = encode(&patch)?;
    let doc = store
        .update(collections::ISSUES, id, fields)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to update issue"))?;
    decode(doc)
}

pub async fn delete_issue(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store
        .delete(collections::ISSUES, id)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to delete issue"))
}

pub async fn get_issue(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Issue>, StoreError> {
    let doc = store
        .get(collections::ISSUES, id)
        .await
        .inspect_err(|e| error!(error = %e, id, "failed to fetch issue"))?;
    doc.map(decode).transpose()
}

pub async fn list_issues(
    store: &dyn DocumentStore,
    filter: IssueFilter,
) -> Result<Vec<Issue>, StoreError> {
    let mut query = Query::new();
    if let Some(orphanage_id) = filter.orphanage_id {
        query = query.filter("orphanage_id", orphanage_id);
    }
    if let Some(status) = filter.status {
        query = query.filter("status", json!(status));
    }
    if let Some(category) = filter.category {
        query = query.filter("category", json!(category));
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    let docs = store
        .query(collections::ISSUES, query)
        .await
        .inspect_err(|e| error!(error = %e, "failed to list issues"))?;
    docs.into_iter().map(decode).collect()
}
