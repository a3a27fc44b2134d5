use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::instrument;

use crate::data::orphanages::{self, NewOrphanage, OrphanageFilter, OrphanagePatch};
use crate::error::AppError;
use crate::models::Orphanage;
use crate::AppState;

/// Register an orphanage
#[utoipa::path(
    post,
    path = "/orphanages",
    request_body = NewOrphanage,
    responses(
        (status = 201, description = "Orphanage registered", body = Orphanage),
        (status = 422, description = "Invalid request body")
    )
)]
#[instrument(skip(state, input))]
pub async fn create_orphanage(
    State(state): State<AppState>,
    Json(input): Json<NewOrphanage>,
) -> Result<impl IntoResponse, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name must not be empty".to_string()));
    }
    let orphanage = orphanages::create_orphanage(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(orphanage)))
}

/// List orphanages, newest first
#[utoipa::path(
    get,
    path = "/orphanages",
    params(OrphanageFilter),
    responses(
        (status = 200, description = "Matching orphanages", body = Vec<Orphanage>)
    )
)]
#[instrument(skip(state))]
pub async fn list_orphanages(
    State(state): State<AppState>,
    Query(filter): Query<OrphanageFilter>,
) -> Result<Json<Vec<Orphanage>>, AppError> {
    let orphanages = orphanages::list_orphanages(state.store.as_ref(), filter).await?;
    Ok(Json(orphanages))
}

/// Fetch a single orphanage by id
#[utoipa::path(
    get,
    path = "/orphanages/{id}",
    params(("id" = String, Path, description = "Orphanage id")),
    responses(
        (status = 200, description = "The orphanage", body = Orphanage),
        (status = 404, description = "No such orphanage")
    )
)]
#[instrument(skip(state))]
pub async fn get_orphanage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Orphanage>, AppError> {
    let orphanage = orphanages::get_orphanage(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("orphanage {}", id)))?;
    Ok(Json(orphanage))
}

/// Apply a partial update to an orphanage
#[utoipa::path(
    patch,
    path = "/orphanages/{id}",
    params(("id" = String, Path, description = "Orphanage id")),
    request_body = OrphanagePatch,
    responses(
        (status = 200, description = "The updated orphanage", body = Orphanage),
        (status = 404, description = "No such orphanage")
    )
)]
#[instrument(skip(state, patch))]
pub async fn update_orphanage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<OrphanagePatch>,
) -> Result<Json<Orphanage>, AppError> {
    let orphanage = orphanages::update_orphanage(state.store.as_ref(), &id, patch).await?;
    Ok(Json(orphanage))
}

/// Delete an orphanage
#[utoipa::path(
    delete,
    path = "/orphanages/{id}",
    params(("id" = String, Path, description = "Orphanage id")),
    responses(
        (status = 204, description = "Orphanage deleted"),
        (status = 404, description = "No such orphanage")
    )
)]
#[instrument(skip(state))]
pub async fn delete_orphanage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    orphanages::delete_orphanage(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
