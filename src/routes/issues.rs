use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::instrument;

use crate::data::issues::{self, IssueFilter, IssuePatch, NewIssue};
use crate::error::AppError;
use crate::models::Issue;
use crate::AppState;

/// Create a funding issue for an orphanage
#[utoipa::path(
    post,
    path = "/issues",
    request_body = NewIssue,
    responses(
        (status = 201, description = "Issue created", body = Issue),
        (status = 422, description = "Invalid request body")
    )
)]
#[instrument(skip(state, input))]
pub async fn create_issue(
    State(state): State<AppState>,
    Json(input): Json<NewIssue>,
) -> Result<impl IntoResponse, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("title must not be empty".to_string()));
    }
    if input.estimated_cost <= 0.0 {
        return Err(AppError::InvalidRequest(
            "estimated_cost must be positive".to_string(),
        ));
    }
    let issue = issues::create_issue(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

/// List issues, newest first
#[utoipa::path(
    get,
    path = "/issues",
    params(IssueFilter),
    responses(
        (status = 200, description = "Matching issues", body = Vec<Issue>)
    )
)]
#[instrument(skip(state))]
pub async fn list_issues(
    State(state): State<AppState>,
    Query(filter): Query<IssueFilter>,
) -> Result<Json<Vec<Issue>>, AppError> {
    let issues = issues::list_issues(state.store.as_ref(), filter).await?;
    Ok(Json(issues))
}

/// Fetch a single issue by id
#[utoipa::path(
    get,
    path = "/issues/{id}",
    params(("id" = String, Path, description = "Issue id")),
    responses(
        (status = 200, description = "The issue", body = Issue),
        (status = 404, description = "No such issue")
    )
)]
#[instrument(skip(state))]
pub async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Issue>, AppError> {
    let issue = issues::get_issue(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("issue {}", id)))?;
    Ok(Json(issue))
}

/// Apply a partial update to an issue
#[utoipa::path(
    patch,
    path = "/issues/{id}",
    params(("id" = String, Path, description = "Issue id")),
    request_body = IssuePatch,
    responses(
        (status = 200, description = "The updated issue", body = Issue),
        (status = 404, description = "No such issue")
    )
)]
#[instrument(skip(state, patch))]
pub async fn update_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<IssuePatch>,
) -> Result<Json<Issue>, AppError> {
    let issue = issues::update_issue(state.store.as_ref(), &id, patch).await?;
    Ok(Json(issue))
}

/// Delete an issue
#[utoipa::path(
    delete,
    path = "/issues/{id}",
    params(("id" = String, Path, description = "Issue id")),
    responses(
        (status = 204, description = "Issue deleted"),
        (status = 404, description = "No such issue")
    )
)]
#[instrument(skip(state))]
pub async fn delete_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    issues::delete_issue(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
