//! Payment routes: link creation and the provider callback.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::payment::{
    CreatePaymentLinkRequest, PaymentCallback, PaymentCallbackResponse, PaymentLinkOrder,
};
use domain::services::notification::quote_paid;
use persistence::repositories::{ProfileRepository, QuoteRepository};
use shared::crypto::verify_signature;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::middleware::metrics::record_payment_confirmed;
use crate::services::PgNotificationSink;

/// Header carrying the provider's HMAC signature of the callback body.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Query parameters of the provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub quote_id: Option<Uuid>,
}

/// Create a hosted payment link for a quote.
///
/// POST /api/v1/payments/link
///
/// Builds the provider order from the quote and configuration, calls the
/// provider and proxies its JSON response.
pub async fn create_payment_link(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreatePaymentLinkRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    request.validate()?;

    let quote_repo = QuoteRepository::new(state.pool.clone());
    let quote = quote_repo
        .find_by_id(request.quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    if !actor.can_access(quote.client_id, quote.agent_id) {
        return Err(ApiError::NotFound("Quote not found".to_string()));
    }

    let client = ProfileRepository::new(state.pool.clone())
        .find_by_id(quote.client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    let payment = &state.config.payment;
    let order = PaymentLinkOrder {
        amount: quote.total_amount,
        success_url: format!(
            "{}/payment-success?quote_id={}",
            payment.frontend_origin, quote.id
        ),
        failure_url: format!(
            "{}/payment-failure?quote_id={}",
            payment.frontend_origin, quote.id
        ),
        callback_url: format!(
            "{}/api/v1/payments/callback?quote_id={}",
            payment.callback_base_url, quote.id
        ),
        client_email: client.email,
        methods: payment.methods.clone(),
        message: "Plaquette d'offres".to_string(),
    };

    let response = state.payment.create_link(&order).await.map_err(|err| {
        warn!(quote_id = %quote.id, error = %err, "Payment link creation failed");
        ApiError::ServiceUnavailable("Payment provider unavailable".to_string())
    })?;

    info!(quote_id = %quote.id, user_id = %actor.id, "Payment link requested");

    Ok(Json(response))
}

/// Provider callback flipping a quote's payment status.
///
/// POST /api/v1/payments/callback?quote_id=
///
/// A `PAID` or `SUCCESS` status marks the quote paid and answers
/// `{success: true}`; anything else leaves the quote untouched and answers
/// `{success: false}`. The write targets a fixed value, so duplicate
/// deliveries are harmless. When a callback secret is configured the raw
/// body must carry a valid HMAC-SHA256 hex signature.
pub async fn payment_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PaymentCallbackResponse>, ApiError> {
    let secret = &state.config.payment.callback_secret;
    if !secret.is_empty() {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing callback signature".to_string()))?;
        if !verify_signature(secret, &body, signature) {
            return Err(ApiError::Unauthorized(
                "Invalid callback signature".to_string(),
            ));
        }
    }

    let quote_id = params
        .quote_id
        .ok_or_else(|| ApiError::Validation("quote_id is required".to_string()))?;

    let callback: PaymentCallback = serde_json::from_slice(&body)
        .map_err(|_| ApiError::Validation("Invalid callback body".to_string()))?;

    info!(quote_id = %quote_id, status = %callback.status, "Payment callback received");

    let quote_repo = QuoteRepository::new(state.pool.clone());
    let quote = quote_repo
        .find_by_id(quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    if !callback.is_successful() {
        return Ok(Json(PaymentCallbackResponse {
            success: false,
            message: Some("Payment not successful".to_string()),
        }));
    }

    quote_repo.mark_paid(quote.id).await?;
    record_payment_confirmed();
    info!(quote_id = %quote.id, reference = %quote.reference, "Quote marked as paid");

    // Best-effort notification fan-out to both parties.
    let sink = PgNotificationSink::new(state.pool.clone());
    let mut drafts = vec![quote_paid(quote.client_id, &quote.reference)];
    if quote.agent_id != quote.client_id {
        drafts.push(quote_paid(quote.agent_id, &quote.reference));
    }
    sink.deliver_all(drafts).await;

    Ok(Json(PaymentCallbackResponse {
        success: true,
        message: None,
    }))
}
