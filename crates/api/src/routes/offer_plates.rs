//! Offer plate routes.

use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::cart::SelectedExtra;
use domain::models::offer_plate::{
    ListOfferPlatesResponse, OfferPlate, OfferPlateDetail, OfferPlateItem, OfferPlateStatus,
    UpdatePlateStatusRequest,
};
use domain::services::notification::{plate_decided, plate_sent};
use persistence::entities::{ItemExtraEntity, PlateItemWithOfferEntity};
use persistence::repositories::OfferPlateRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::PgNotificationSink;

/// Role-gated listing of non-draft plates, newest first.
///
/// GET /api/v1/offer-plates
pub async fn list_plates(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ListOfferPlatesResponse>, ApiError> {
    let repo = OfferPlateRepository::new(state.pool.clone());
    let plates = repo.list_for_actor(actor.id, actor.role).await?;

    Ok(Json(ListOfferPlatesResponse {
        data: plates.into_iter().map(Into::into).collect(),
    }))
}

/// Non-draft plates that no quote references yet.
///
/// GET /api/v1/offer-plates/without-quotes
pub async fn list_plates_without_quotes(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ListOfferPlatesResponse>, ApiError> {
    let repo = OfferPlateRepository::new(state.pool.clone());
    let plates = repo.list_without_quotes(actor.id, actor.role).await?;

    Ok(Json(ListOfferPlatesResponse {
        data: plates.into_iter().map(Into::into).collect(),
    }))
}

/// Plate detail with items and offer info.
///
/// GET /api/v1/offer-plates/:plate_id
///
/// Visible only to the plate's client, its agent, or an admin.
pub async fn get_plate(
    State(state): State<AppState>,
    actor: Actor,
    Path(plate_id): Path<Uuid>,
) -> Result<Json<OfferPlateDetail>, ApiError> {
    let repo = OfferPlateRepository::new(state.pool.clone());
    let plate = repo
        .find_by_id(plate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer plate not found".to_string()))?;

    if !actor.can_access(plate.client_id, plate.agent_id) {
        return Err(ApiError::NotFound("Offer plate not found".to_string()));
    }

    let items = repo.list_items(plate_id).await?;
    let extras = repo.list_item_extras(plate_id).await?;

    Ok(Json(OfferPlateDetail {
        plate: plate.into(),
        items: assemble_items(items, extras),
    }))
}

/// Change a plate's status through the validated transition table.
///
/// PATCH /api/v1/offer-plates/:plate_id/status
///
/// Illegal edges are rejected with 409; the update is conditional on the
/// expected current status so concurrent writers cannot race one through.
pub async fn update_plate_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(plate_id): Path<Uuid>,
    Json(request): Json<UpdatePlateStatusRequest>,
) -> Result<Json<OfferPlate>, ApiError> {
    request.validate()?;

    let repo = OfferPlateRepository::new(state.pool.clone());
    let plate = repo
        .find_by_id(plate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer plate not found".to_string()))?;

    if !actor.can_access(plate.client_id, plate.agent_id) {
        return Err(ApiError::NotFound("Offer plate not found".to_string()));
    }

    let current: OfferPlateStatus = plate.status.into();
    let target = current.transition_to(request.status)?;

    let rows_affected = repo
        .update_status_guarded(plate_id, plate.status, target.into())
        .await?;
    if rows_affected == 0 {
        return Err(ApiError::Conflict(
            "Offer plate status changed concurrently".to_string(),
        ));
    }

    info!(
        plate_id = %plate_id,
        from = %current,
        to = %target,
        user_id = %actor.id,
        "Offer plate status updated"
    );

    // Notify the counterpart of the change, best-effort.
    let sink = PgNotificationSink::new(state.pool.clone());
    let draft = match target {
        OfferPlateStatus::Sent => Some(plate_sent(plate.client_id, &plate.name)),
        OfferPlateStatus::Accepted | OfferPlateStatus::Rejected => {
            (plate.agent_id != plate.client_id).then(|| {
                plate_decided(
                    plate.agent_id,
                    &plate.name,
                    target == OfferPlateStatus::Accepted,
                )
            })
        }
        OfferPlateStatus::Draft => None,
    };
    if let Some(draft) = draft {
        sink.deliver_all(vec![draft]).await;
    }

    let updated = repo
        .find_by_id(plate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer plate not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Joins plate items with their selected extras.
pub(crate) fn assemble_items(
    items: Vec<PlateItemWithOfferEntity>,
    extras: Vec<ItemExtraEntity>,
) -> Vec<OfferPlateItem> {
    let mut extras_by_item: HashMap<Uuid, Vec<SelectedExtra>> = HashMap::new();
    for extra in extras {
        extras_by_item
            .entry(extra.item_id)
            .or_default()
            .push(SelectedExtra {
                extra_id: extra.extra_id,
                name: extra.extra_name,
                unit_price: extra.unit_price,
                quantity: extra.quantity,
            });
    }

    items
        .into_iter()
        .map(|item| OfferPlateItem {
            id: item.id,
            offer_id: item.offer_id,
            offer_name: item.offer_name,
            price_monthly: item.price_monthly,
            setup_fee: item.setup_fee,
            quantity: item.quantity,
            extras: extras_by_item.remove(&item.id).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_items_groups_extras() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let items = vec![
            PlateItemWithOfferEntity {
                id: first,
                offer_plate_id: Uuid::nil(),
                offer_id: Uuid::new_v4(),
                quantity: 1,
                offer_name: "Offre A".to_string(),
                offer_description: None,
                price_monthly: 10.0,
                setup_fee: 0.0,
                category: "internet".to_string(),
                image_url: None,
            },
            PlateItemWithOfferEntity {
                id: second,
                offer_plate_id: Uuid::nil(),
                offer_id: Uuid::new_v4(),
                quantity: 2,
                offer_name: "Offre B".to_string(),
                offer_description: None,
                price_monthly: 20.0,
                setup_fee: 5.0,
                category: "cloud".to_string(),
                image_url: None,
            },
        ];
        let extras = vec![ItemExtraEntity {
            item_id: second,
            extra_id: Uuid::new_v4(),
            quantity: 1,
            extra_name: "Option".to_string(),
            unit_price: 2.5,
        }];

        let assembled = assemble_items(items, extras);
        assert_eq!(assembled.len(), 2);
        assert!(assembled.iter().find(|i| i.id == first).unwrap().extras.is_empty());
        assert_eq!(assembled.iter().find(|i| i.id == second).unwrap().extras.len(), 1);
    }
}
