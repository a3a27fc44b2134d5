use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::instrument;

use crate::data::success_stories::{self, StoryFilter};
use crate::error::AppError;
use crate::jobs::{self, StoryStats, SyncReport};
use crate::models::SuccessStory;
use crate::AppState;

/// List success stories, newest first
#[utoipa::path(
    get,
    path = "/success-stories",
    params(StoryFilter),
    responses(
        (status = 200, description = "Matching success stories", body = Vec<SuccessStory>)
    )
)]
#[instrument(skip(state))]
pub async fn list_stories(
    State(state): State<AppState>,
    Query(filter): Query<StoryFilter>,
) -> Result<Json<Vec<SuccessStory>>, AppError> {
    let stories = success_stories::list_success_stories(state.store.as_ref(), filter).await?;
    Ok(Json(stories))
}

/// Fetch a single success story by id
#[utoipa::path(
    get,
    path = "/success-stories/{id}",
    params(("id" = String, Path, description = "Story id")),
    responses(
        (status = 200, description = "The story", body = SuccessStory),
        (status = 404, description = "No such story")
    )
)]
#[instrument(skip(state))]
pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessStory>, AppError> {
    let story = success_stories::get_success_story(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("success story {}", id)))?;
    Ok(Json(story))
}

/// Summary statistics over all success stories
#[utoipa::path(
    get,
    path = "/success-stories/stats",
    responses(
        (status = 200, description = "Aggregated story statistics", body = StoryStats)
    )
)]
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StoryStats>, AppError> {
    let stats = jobs::story_stats(state.store.as_ref()).await?;
    Ok(Json(stats))
}

/// Derive success stories from resolved, fully funded issues
#[utoipa::path(
    post,
    path = "/success-stories/sync",
    responses(
        (status = 200, description = "Sync report", body = SyncReport)
    ),
    description = "Re-runs the derivation pipeline. Safe to call repeatedly: \
                   existing stories are refreshed in place, never duplicated."
)]
#[instrument(skip(state))]
pub async fn sync_stories(State(state): State<AppState>) -> Result<Json<SyncReport>, AppError> {
    let report = jobs::sync_success_stories(state.store.as_ref()).await?;
    Ok(Json(report))
}
