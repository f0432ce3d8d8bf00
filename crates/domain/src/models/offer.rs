//! Offer catalog domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A sellable catalog item with a monthly price and a one-time setup fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Offer {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_monthly: f64,
    pub setup_fee: f64,
    pub category: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    /// Free-text selling points shown on the catalog card.
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// An optional paid add-on attached to an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OfferExtra {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub name: String,
    pub unit_price: f64,
}

/// Catalog search parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OfferQuery {
    /// Case-insensitive substring match on the offer name.
    pub search: Option<String>,
    /// Exact category filter.
    pub category: Option<String>,
}

/// Request to create a catalog offer (admin only).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateOfferRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "price_monthly must be non-negative"))]
    pub price_monthly: f64,

    #[validate(range(min = 0.0, message = "setup_fee must be non-negative"))]
    #[serde(default)]
    pub setup_fee: f64,

    #[validate(length(min = 1, max = 100, message = "category must be 1-100 characters"))]
    pub category: String,

    pub image_url: Option<String>,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub extras: Vec<CreateOfferExtra>,
}

/// Extra declared inline with an offer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateOfferExtra {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "unit_price must be non-negative"))]
    pub unit_price: f64,
}

/// Request to update a catalog offer (admin only). Absent fields are kept.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateOfferRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "price_monthly must be non-negative"))]
    pub price_monthly: Option<f64>,

    #[validate(range(min = 0.0, message = "setup_fee must be non-negative"))]
    pub setup_fee: Option<f64>,

    #[validate(length(min = 1, max = 100, message = "category must be 1-100 characters"))]
    pub category: Option<String>,

    pub image_url: Option<String>,

    pub is_active: Option<bool>,
}

/// Response for the category listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCategoriesResponse {
    pub data: Vec<String>,
}
