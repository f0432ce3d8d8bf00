//! Cart routes.
//!
//! The cart is the actor's single draft offer plate, created implicitly on
//! the first add-to-cart. Finalization converts it into a sent plate in one
//! transaction and fans out notifications.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::cart::{
    AddToCartRequest, CartItem, CartOffer, CartResponse, FinalizeCartRequest, SelectedExtra,
    SetItemExtrasRequest, UpdateQuantityRequest,
};
use domain::models::offer_plate::OfferPlate;
use domain::services::notification::{plate_assigned, plate_sent};
use domain::services::pricing::{quote_totals, PricedExtra, PricedItem};
use persistence::entities::{ItemExtraEntity, PlateItemWithOfferEntity};
use persistence::repositories::{
    CartRepository, FolderRepository, OfferPlateRepository, OfferRepository, ProfileRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::middleware::metrics::record_plate_finalized;
use crate::services::PgNotificationSink;

/// Response after adding an offer to the cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AddToCartResponse {
    pub plate_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Get the actor's cart.
///
/// GET /api/v1/cart
///
/// An actor with no draft plate gets an empty cart, never an error.
pub async fn get_cart(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<CartResponse>, ApiError> {
    let cart_repo = CartRepository::new(state.pool.clone());

    let Some(draft) = cart_repo.find_draft_plate(actor.id).await? else {
        return Ok(Json(CartResponse {
            plate_id: None,
            items: vec![],
            monthly_total: 0.0,
            extras_total: 0.0,
            setup_total: 0.0,
        }));
    };

    let plate_repo = OfferPlateRepository::new(state.pool.clone());
    let items = plate_repo.list_items(draft.id).await?;
    let extras = plate_repo.list_item_extras(draft.id).await?;

    Ok(Json(assemble_cart(draft.id, items, extras)))
}

/// Add an offer to the cart, creating the draft plate on first use.
///
/// POST /api/v1/cart/items
///
/// Adding an offer already in the cart increments that line's quantity.
pub async fn add_item(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<AddToCartResponse>), ApiError> {
    request.validate()?;

    let offer_repo = OfferRepository::new(state.pool.clone());
    offer_repo
        .find_active_entity(request.offer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found or inactive".to_string()))?;

    let cart_repo = CartRepository::new(state.pool.clone());
    let draft = cart_repo.get_or_create_draft(actor.id).await?;
    let item = cart_repo
        .add_item(draft.id, request.offer_id, request.quantity)
        .await?;

    info!(
        user_id = %actor.id,
        offer_id = %request.offer_id,
        quantity = item.quantity,
        "Offer added to cart"
    );

    Ok((
        StatusCode::CREATED,
        Json(AddToCartResponse {
            plate_id: draft.id,
            item_id: item.id,
            quantity: item.quantity,
        }),
    ))
}

/// Change a cart line's quantity.
///
/// PATCH /api/v1/cart/items/:item_id
pub async fn update_item(
    State(state): State<AppState>,
    actor: Actor,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    let cart_repo = CartRepository::new(state.pool.clone());
    let draft = cart_repo
        .find_draft_plate(actor.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cart is empty".to_string()))?;

    let rows_affected = cart_repo
        .update_item_quantity(draft.id, item_id, request.quantity)
        .await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Cart item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Replace a cart line's selected extras.
///
/// PUT /api/v1/cart/items/:item_id/extras
pub async fn set_item_extras(
    State(state): State<AppState>,
    actor: Actor,
    Path(item_id): Path<Uuid>,
    Json(request): Json<SetItemExtrasRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    let cart_repo = CartRepository::new(state.pool.clone());
    let draft = cart_repo
        .find_draft_plate(actor.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cart is empty".to_string()))?;

    let selections: Vec<(Uuid, i32)> = request
        .extras
        .iter()
        .map(|extra| (extra.extra_id, extra.quantity))
        .collect();

    cart_repo
        .set_item_extras(draft.id, item_id, &selections)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => {
                ApiError::NotFound("Cart item or extra not found".to_string())
            }
            other => other.into(),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a line from the cart.
///
/// DELETE /api/v1/cart/items/:item_id
pub async fn remove_item(
    State(state): State<AppState>,
    actor: Actor,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let cart_repo = CartRepository::new(state.pool.clone());
    let draft = cart_repo
        .find_draft_plate(actor.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cart is empty".to_string()))?;

    let rows_affected = cart_repo.remove_item(draft.id, item_id).await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Cart item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Finalize the cart into a sent offer plate.
///
/// POST /api/v1/cart/finalize
///
/// A client's plate is assigned to the first available agent; an agent must
/// name the client the plate is for. Insert, item copy and draft emptying
/// run in one transaction; notification fan-out is best-effort afterwards.
pub async fn finalize(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<FinalizeCartRequest>,
) -> Result<(StatusCode, Json<OfferPlate>), ApiError> {
    request.validate()?;

    let cart_repo = CartRepository::new(state.pool.clone());
    let plate_repo = OfferPlateRepository::new(state.pool.clone());
    let profile_repo = ProfileRepository::new(state.pool.clone());

    let draft = cart_repo
        .find_draft_plate(actor.id)
        .await?
        .ok_or_else(|| ApiError::Validation("Cart is empty".to_string()))?;

    let items = plate_repo.list_items(draft.id).await?;
    if items.is_empty() {
        return Err(ApiError::Validation("Cart is empty".to_string()));
    }

    // Resolve the client/agent pairing for the sent plate.
    let (client_id, agent_id, client_name) = if actor.role.is_staff() {
        let client_id = request.client_id.ok_or_else(|| {
            ApiError::Validation("client_id is required when an agent finalizes a cart".to_string())
        })?;
        let client = profile_repo
            .find_by_id(client_id)
            .await?
            .filter(|p| matches!(p.role, persistence::entities::UserRoleDb::Client))
            .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;
        let client: domain::models::profile::Profile = client.into();
        (client_id, actor.id, client.display_name())
    } else {
        // First available agent takes the plate; fall back to the client
        // themselves when no agent account exists.
        let agent_id = profile_repo
            .first_available_agent()
            .await?
            .map(|agent| agent.id)
            .unwrap_or(actor.id);
        (actor.id, agent_id, actor.display_name().to_string())
    };

    if let Some(folder_id) = request.folder_id {
        FolderRepository::new(state.pool.clone())
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Folder not found".to_string()))?;
    }

    let plate = cart_repo
        .finalize(draft.id, &request.name, client_id, agent_id, request.folder_id)
        .await?;

    record_plate_finalized();
    info!(
        plate_id = %plate.id,
        client_id = %client_id,
        agent_id = %agent_id,
        item_count = items.len(),
        "Cart finalized into sent offer plate"
    );

    // Best-effort notification fan-out; failures are logged and dropped.
    let sink = PgNotificationSink::new(state.pool.clone());
    let mut drafts = vec![plate_sent(client_id, &request.name)];
    if agent_id != client_id {
        drafts.push(plate_assigned(agent_id, &request.name, &client_name));
    }
    sink.deliver_all(drafts).await;

    Ok((StatusCode::CREATED, Json(plate.into())))
}

/// Assembles cart line items, their extras and the running totals.
fn assemble_cart(
    plate_id: Uuid,
    items: Vec<PlateItemWithOfferEntity>,
    extras: Vec<ItemExtraEntity>,
) -> CartResponse {
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

    let cart_items: Vec<CartItem> = items
        .into_iter()
        .map(|item| {
            let selected = extras_by_item.remove(&item.id).unwrap_or_default();
            CartItem {
                id: item.id,
                offer: CartOffer {
                    id: item.offer_id,
                    name: item.offer_name,
                    description: item.offer_description,
                    price_monthly: item.price_monthly,
                    setup_fee: item.setup_fee,
                    category: item.category,
                    image_url: item.image_url,
                },
                quantity: item.quantity,
                extras: selected,
            }
        })
        .collect();

    let priced: Vec<PricedItem> = cart_items
        .iter()
        .map(|item| PricedItem {
            price_monthly: item.offer.price_monthly,
            setup_fee: item.offer.setup_fee,
            quantity: item.quantity,
            extras: item
                .extras
                .iter()
                .map(|extra| PricedExtra {
                    unit_price: extra.unit_price,
                    quantity: extra.quantity,
                })
                .collect(),
        })
        .collect();
    let totals = quote_totals(&priced);

    CartResponse {
        plate_id: Some(plate_id),
        items: cart_items,
        monthly_total: totals.monthly_total,
        extras_total: totals.extras_total,
        setup_total: totals.setup_total,
    }
}
