//! Quote routes.
//!
//! Quotes are created once from a sent offer plate with a server-computed
//! total and only move through the validated status table afterwards.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::payment::{PaymentInfo, UpsertPaymentInfoRequest};
use domain::models::quote::{
    generate_quote_reference, CreateQuoteRequest, ListQuotesResponse, Quote, QuoteDetail,
    QuoteStatus, UpdateQuoteStatusRequest,
};
use domain::services::notification::{quote_created, quote_status_changed};
use domain::services::pricing::{quote_totals, PricedExtra, PricedItem, QuoteTotals};
use persistence::entities::{ItemExtraEntity, OfferPlateStatusDb, PlateItemWithOfferEntity};
use persistence::repositories::{OfferPlateRepository, QuoteRepository};
use shared::validation::{normalize_bank_code, validate_bic, validate_iban};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::middleware::metrics::record_quote_created;
use crate::routes::offer_plates::assemble_items;
use crate::services::PgNotificationSink;

/// How many reference collisions to tolerate before giving up.
const REFERENCE_ATTEMPTS: usize = 3;

/// Create a quote from a sent offer plate.
///
/// POST /api/v1/quotes
///
/// Agent/admin only. The total is computed here, once, from the plate's
/// items: monthly price x quantity plus extras; setup fees are reported
/// separately and excluded from the stored total.
pub async fn create_quote(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<QuoteDetail>), ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden(
            "Only agents and admins can create quotes".to_string(),
        ));
    }
    request.validate()?;

    let plate_repo = OfferPlateRepository::new(state.pool.clone());
    let quote_repo = QuoteRepository::new(state.pool.clone());

    let plate = plate_repo
        .find_by_id(request.offer_plate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer plate not found".to_string()))?;

    if plate.status == OfferPlateStatusDb::Draft {
        return Err(ApiError::Validation(
            "Cannot create a quote from a draft plate".to_string(),
        ));
    }
    if quote_repo.exists_for_plate(plate.id).await? {
        return Err(ApiError::Conflict(
            "A quote already exists for this offer plate".to_string(),
        ));
    }

    let items = plate_repo.list_items(plate.id).await?;
    let extras = plate_repo.list_item_extras(plate.id).await?;
    let totals = compute_totals(&items, &extras);

    let folder_id = request.folder_id.or(plate.folder_id);

    // Retry on the unlikely reference collision.
    let mut quote = None;
    for attempt in 0..REFERENCE_ATTEMPTS {
        let reference = generate_quote_reference();
        match quote_repo
            .create(
                &reference,
                plate.id,
                plate.client_id,
                plate.agent_id,
                folder_id,
                totals.total_amount(),
            )
            .await
        {
            Ok(created) => {
                quote = Some(created);
                break;
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23505")
                    && attempt + 1 < REFERENCE_ATTEMPTS =>
            {
                continue;
            }
            Err(err) => return Err(err.into()),
        }
    }
    let quote = quote.ok_or_else(|| {
        ApiError::Internal("Could not generate a unique quote reference".to_string())
    })?;

    record_quote_created();
    info!(
        quote_id = %quote.id,
        reference = %quote.reference,
        plate_id = %plate.id,
        total_amount = quote.total_amount,
        agent_id = %actor.id,
        "Quote created"
    );

    // Best-effort notification to the client.
    let sink = PgNotificationSink::new(state.pool.clone());
    sink.deliver_all(vec![quote_created(
        quote.client_id,
        &quote.reference,
        quote.total_amount,
    )])
    .await;

    Ok((
        StatusCode::CREATED,
        Json(QuoteDetail {
            quote: quote.into(),
            breakdown: totals.breakdown(),
            items: assemble_items(items, extras),
        }),
    ))
}

/// Role-gated quote listing, newest first.
///
/// GET /api/v1/quotes
pub async fn list_quotes(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ListQuotesResponse>, ApiError> {
    let repo = QuoteRepository::new(state.pool.clone());
    let quotes = repo.list_for_actor(actor.id, actor.role).await?;

    Ok(Json(ListQuotesResponse {
        data: quotes.into_iter().map(Into::into).collect(),
    }))
}

/// Quote detail with plate items and a pricing breakdown.
///
/// GET /api/v1/quotes/:quote_id
pub async fn get_quote(
    State(state): State<AppState>,
    actor: Actor,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<QuoteDetail>, ApiError> {
    let quote_repo = QuoteRepository::new(state.pool.clone());
    let plate_repo = OfferPlateRepository::new(state.pool.clone());

    let quote = quote_repo
        .find_by_id(quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    if !actor.can_access(quote.client_id, quote.agent_id) {
        return Err(ApiError::NotFound("Quote not found".to_string()));
    }

    let items = plate_repo.list_items(quote.offer_plate_id).await?;
    let extras = plate_repo.list_item_extras(quote.offer_plate_id).await?;
    // The breakdown is display-only; the stored total never changes.
    let totals = compute_totals(&items, &extras);

    Ok(Json(QuoteDetail {
        quote: quote.into(),
        breakdown: totals.breakdown(),
        items: assemble_items(items, extras),
    }))
}

/// Change a quote's status through the validated transition table.
///
/// PATCH /api/v1/quotes/:quote_id/status
///
/// Clients may only accept or reject their own sent quote; agents and
/// admins drive the rest of the lifecycle. Illegal edges are 409s.
pub async fn update_quote_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(quote_id): Path<Uuid>,
    Json(request): Json<UpdateQuoteStatusRequest>,
) -> Result<Json<Quote>, ApiError> {
    request.validate()?;

    let repo = QuoteRepository::new(state.pool.clone());
    let quote = repo
        .find_by_id(quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    if !actor.can_access(quote.client_id, quote.agent_id) {
        return Err(ApiError::NotFound("Quote not found".to_string()));
    }
    if !actor.role.is_staff() && !request.status.settable_by_client() {
        return Err(ApiError::Forbidden(
            "Clients can only accept or reject a quote".to_string(),
        ));
    }

    let current: QuoteStatus = quote.status.into();
    let target = current.transition_to(request.status)?;

    let rows_affected = repo
        .update_status_guarded(quote_id, quote.status, target.into())
        .await?;
    if rows_affected == 0 {
        return Err(ApiError::Conflict(
            "Quote status changed concurrently".to_string(),
        ));
    }

    info!(
        quote_id = %quote_id,
        reference = %quote.reference,
        from = %current,
        to = %target,
        user_id = %actor.id,
        "Quote status updated"
    );

    // Notify the counterpart, best-effort.
    let counterpart = if actor.id == quote.client_id {
        quote.agent_id
    } else {
        quote.client_id
    };
    if counterpart != actor.id {
        let sink = PgNotificationSink::new(state.pool.clone());
        sink.deliver_all(vec![quote_status_changed(
            counterpart,
            &quote.reference,
            target,
        )])
        .await;
    }

    let updated = repo
        .find_by_id(quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Bank details attached to a quote.
///
/// GET /api/v1/quotes/:quote_id/payment-info
pub async fn get_payment_info(
    State(state): State<AppState>,
    actor: Actor,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<PaymentInfo>, ApiError> {
    let repo = QuoteRepository::new(state.pool.clone());
    let quote = repo
        .find_by_id(quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    if !actor.can_access(quote.client_id, quote.agent_id) {
        return Err(ApiError::NotFound("Quote not found".to_string()));
    }

    let info = repo
        .find_payment_info(quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No payment info for this quote".to_string()))?;

    Ok(Json(info.into()))
}

/// Create or replace a quote's bank details.
///
/// PUT /api/v1/quotes/:quote_id/payment-info
///
/// Agent/admin only; IBAN and BIC are format-checked and normalized.
pub async fn put_payment_info(
    State(state): State<AppState>,
    actor: Actor,
    Path(quote_id): Path<Uuid>,
    Json(request): Json<UpsertPaymentInfoRequest>,
) -> Result<Json<PaymentInfo>, ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden(
            "Only agents and admins can record payment info".to_string(),
        ));
    }
    request.validate()?;
    validate_iban(&request.iban).map_err(|e| {
        ApiError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default())
    })?;
    validate_bic(&request.bic).map_err(|e| {
        ApiError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default())
    })?;

    let repo = QuoteRepository::new(state.pool.clone());
    let quote = repo
        .find_by_id(quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    if !actor.can_access(quote.client_id, quote.agent_id) {
        return Err(ApiError::NotFound("Quote not found".to_string()));
    }

    let info = repo
        .upsert_payment_info(
            quote_id,
            &request.bank_name,
            &normalize_bank_code(&request.iban),
            &normalize_bank_code(&request.bic),
        )
        .await?;

    info!(quote_id = %quote_id, user_id = %actor.id, "Payment info recorded");

    Ok(Json(info.into()))
}

/// Totals over plate items and their selected extras.
fn compute_totals(
    items: &[PlateItemWithOfferEntity],
    extras: &[ItemExtraEntity],
) -> QuoteTotals {
    let priced: Vec<PricedItem> = items
        .iter()
        .map(|item| PricedItem {
            price_monthly: item.price_monthly,
            setup_fee: item.setup_fee,
            quantity: item.quantity,
            extras: extras
                .iter()
                .filter(|extra| extra.item_id == item.id)
                .map(|extra| PricedExtra {
                    unit_price: extra.unit_price,
                    quantity: extra.quantity,
                })
                .collect(),
        })
        .collect();
    quote_totals(&priced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_totals_includes_extras_excludes_setup() {
        let item_id = Uuid::new_v4();
        let items = vec![PlateItemWithOfferEntity {
            id: item_id,
            offer_plate_id: Uuid::nil(),
            offer_id: Uuid::new_v4(),
            quantity: 2,
            offer_name: "Offre".to_string(),
            offer_description: None,
            price_monthly: 19.99,
            setup_fee: 49.0,
            category: "internet".to_string(),
            image_url: None,
        }];
        let extras = vec![ItemExtraEntity {
            item_id,
            extra_id: Uuid::new_v4(),
            quantity: 1,
            extra_name: "Option".to_string(),
            unit_price: 5.0,
        }];

        let totals = compute_totals(&items, &extras);
        assert!((totals.monthly_total - 39.98).abs() < 1e-9);
        assert_eq!(totals.extras_total, 5.0);
        assert_eq!(totals.setup_total, 98.0);
        assert!((totals.total_amount() - 44.98).abs() < 1e-9);
    }
}
