use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{instrument, warn};

use crate::data::donations::{self, DonationFilter, DonationPatch, NewDonation};
use crate::data::issues::{self, IssuePatch};
use crate::error::AppError;
use crate::models::{Donation, DonationStatus};
use crate::AppState;

/// Record a donation
#[utoipa::path(
    post,
    path = "/donations",
    request_body = NewDonation,
    responses(
        (status = 201, description = "Donation recorded", body = Donation),
        (status = 422, description = "Invalid request body")
    )
)]
#[instrument(skip(state, input))]
pub async fn create_donation(
    State(state): State<AppState>,
    Json(input): Json<NewDonation>,
) -> Result<impl IntoResponse, AppError> {
    if input.amount <= 0.0 {
        return Err(AppError::InvalidRequest("amount must be positive".to_string()));
    }
    let donation = donations::create_donation(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

/// List donations, newest first
#[utoipa::path(
    get,
    path = "/donations",
    params(DonationFilter),
    responses(
        (status = 200, description = "Matching donations", body = Vec<Donation>)
    )
)]
#[instrument(skip(state))]
pub async fn list_donations(
    State(state): State<AppState>,
    Query(filter): Query<DonationFilter>,
) -> Result<Json<Vec<Donation>>, AppError> {
    let donations = donations::list_donations(state.store.as_ref(), filter).await?;
    Ok(Json(donations))
}

/// Fetch a single donation by id
#[utoipa::path(
    get,
    path = "/donations/{id}",
    params(("id" = String, Path, description = "Donation id")),
    responses(
        (status = 200, description = "The donation", body = Donation),
        (status = 404, description = "No such donation")
    )
)]
#[instrument(skip(state))]
pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Donation>, AppError> {
    let donation = donations::get_donation(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("donation {}", id)))?;
    Ok(Json(donation))
}

/// Correct a donation's status
#[utoipa::path(
    patch,
    path = "/donations/{id}",
    params(("id" = String, Path, description = "Donation id")),
    request_body = DonationPatch,
    responses(
        (status = 200, description = "The updated donation", body = Donation),
        (status = 404, description = "No such donation")
    )
)]
#[instrument(skip(state, patch))]
pub async fn update_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<DonationPatch>,
) -> Result<Json<Donation>, AppError> {
    let store = state.store.as_ref();
    let before = donations::get_donation(store, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("donation {}", id)))?;
    let updated = donations::update_donation(store, &id, patch).await?;

    // A pending donation that just completed counts toward its target issue.
    if before.status == DonationStatus::Pending && updated.status == DonationStatus::Completed {
        if let Some(issue_id) = &updated.issue_id {
            match issues::get_issue(store, issue_id).await? {
                Some(issue) => {
                    issues::update_issue(
                        store,
                        issue_id,
                        IssuePatch {
                            raised_amount: Some(issue.raised_amount + updated.amount),
                            ..Default::default()
                        },
                    )
                    .await?;
                }
                None => {
                    warn!(issue_id = %issue_id, "completed donation targets a missing issue");
                }
            }
        }
    }

    Ok(Json(updated))
}

/// Delete a donation
#[utoipa::path(
    delete,
    path = "/donations/{id}",
    params(("id" = String, Path, description = "Donation id")),
    responses(
        (status = 204, description = "Donation deleted"),
        (status = 404, description = "No such donation")
    )
)]
#[instrument(skip(state))]
pub async fn delete_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    donations::delete_donation(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
