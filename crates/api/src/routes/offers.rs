//! Offer catalog routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::offer::{
    CreateOfferRequest, ListCategoriesResponse, Offer, OfferExtra, OfferQuery, UpdateOfferRequest,
};
use persistence::repositories::OfferRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Response for the catalog listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListOffersResponse {
    pub data: Vec<Offer>,
}

/// Response for the extras listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListExtrasResponse {
    pub data: Vec<OfferExtra>,
}

/// List active catalog offers.
///
/// GET /api/v1/offers?search=&category=
pub async fn list_offers(
    State(state): State<AppState>,
    _actor: Actor,
    Query(query): Query<OfferQuery>,
) -> Result<Json<ListOffersResponse>, ApiError> {
    let repo = OfferRepository::new(state.pool.clone());
    let offers = repo
        .list_active(query.search.as_deref(), query.category.as_deref())
        .await?;

    Ok(Json(ListOffersResponse { data: offers }))
}

/// List distinct offer categories.
///
/// GET /api/v1/offers/categories
pub async fn list_categories(
    State(state): State<AppState>,
    _actor: Actor,
) -> Result<Json<ListCategoriesResponse>, ApiError> {
    let repo = OfferRepository::new(state.pool.clone());
    let categories = repo.list_categories().await?;

    Ok(Json(ListCategoriesResponse { data: categories }))
}

/// List purchasable add-ons for an offer.
///
/// GET /api/v1/offers/:offer_id/extras
pub async fn list_offer_extras(
    State(state): State<AppState>,
    _actor: Actor,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<ListExtrasResponse>, ApiError> {
    let repo = OfferRepository::new(state.pool.clone());

    repo.find_by_id(offer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?;

    let extras = repo.list_extras(offer_id).await?;

    Ok(Json(ListExtrasResponse {
        data: extras.into_iter().map(Into::into).collect(),
    }))
}

/// Create a catalog offer.
///
/// POST /api/v1/offers
///
/// Admin only.
pub async fn create_offer(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<Offer>), ApiError> {
    if !actor.role.can_manage_catalog() {
        return Err(ApiError::Forbidden(
            "Only admins can manage the catalog".to_string(),
        ));
    }
    request.validate()?;
    for extra in &request.extras {
        extra.validate()?;
    }

    let repo = OfferRepository::new(state.pool.clone());
    let offer = repo.create(&request).await?;

    info!(offer_id = %offer.id, name = %offer.name, admin_id = %actor.id, "Offer created");

    Ok((StatusCode::CREATED, Json(offer)))
}

/// Update a catalog offer. Absent fields are kept.
///
/// PUT /api/v1/offers/:offer_id
///
/// Admin only.
pub async fn update_offer(
    State(state): State<AppState>,
    actor: Actor,
    Path(offer_id): Path<Uuid>,
    Json(request): Json<UpdateOfferRequest>,
) -> Result<Json<Offer>, ApiError> {
    if !actor.role.can_manage_catalog() {
        return Err(ApiError::Forbidden(
            "Only admins can manage the catalog".to_string(),
        ));
    }
    request.validate()?;

    let repo = OfferRepository::new(state.pool.clone());
    repo.update(offer_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?;

    // Re-read with features for the full response
    let offer = repo
        .find_by_id(offer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?;

    info!(offer_id = %offer_id, admin_id = %actor.id, "Offer updated");

    Ok(Json(offer))
}

/// Soft-delete an offer: hide it from the catalog.
///
/// DELETE /api/v1/offers/:offer_id
///
/// Admin only.
pub async fn delete_offer(
    State(state): State<AppState>,
    actor: Actor,
    Path(offer_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !actor.role.can_manage_catalog() {
        return Err(ApiError::Forbidden(
            "Only admins can manage the catalog".to_string(),
        ));
    }

    let repo = OfferRepository::new(state.pool.clone());
    let rows_affected = repo.deactivate(offer_id).await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Offer not found".to_string()));
    }

    info!(offer_id = %offer_id, admin_id = %actor.id, "Offer deactivated");

    Ok(StatusCode::NO_CONTENT)
}
