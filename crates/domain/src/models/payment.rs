//! Payment domain models: bank details and the payment-provider contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Bank transfer details attached one-to-one to a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaymentInfo {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub bank_name: String,
    pub iban: String,
    pub bic: String,
    pub created_at: DateTime<Utc>,
}

/// Request to create or replace a quote's bank details.
///
/// IBAN and BIC formats are checked with `shared::validation` after the
/// derive-level length checks pass.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpsertPaymentInfoRequest {
    #[validate(length(min = 1, max = 200, message = "bank_name must be 1-200 characters"))]
    pub bank_name: String,

    #[validate(length(min = 1, max = 64, message = "iban must be 1-64 characters"))]
    pub iban: String,

    #[validate(length(min = 1, max = 16, message = "bic must be 1-16 characters"))]
    pub bic: String,
}

/// Request to create a payment link for a quote.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreatePaymentLinkRequest {
    pub quote_id: Uuid,
}

/// Order sent to the external payment provider.
///
/// The provider expects camelCase keys; this struct is the wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkOrder {
    pub amount: f64,
    pub success_url: String,
    pub failure_url: String,
    pub callback_url: String,
    pub client_email: String,
    pub methods: Vec<String>,
    pub message: String,
}

/// Body of the provider's payment callback.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallback {
    pub status: String,
}

impl PaymentCallback {
    /// The provider reports success as either of these markers.
    pub fn is_successful(&self) -> bool {
        self.status == "PAID" || self.status == "SUCCESS"
    }
}

/// Response returned to the provider after a callback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PaymentCallbackResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
