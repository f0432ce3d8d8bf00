//! Cart domain models.
//!
//! The cart is the client's single draft offer plate; items reference
//! catalog offers with a quantity and optional priced extras.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Offer details carried on a cart line item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CartOffer {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_monthly: f64,
    pub setup_fee: f64,
    pub category: String,
    pub image_url: Option<String>,
}

/// An extra selected on a cart line item, with its own quantity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SelectedExtra {
    pub extra_id: Uuid,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
}

/// A cart line item joined with its offer and selected extras.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CartItem {
    pub id: Uuid,
    pub offer: CartOffer,
    pub quantity: i32,
    pub extras: Vec<SelectedExtra>,
}

/// The actor's cart: line items plus running totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CartResponse {
    /// Absent when the client has no draft plate yet.
    pub plate_id: Option<Uuid>,
    pub items: Vec<CartItem>,
    pub monthly_total: f64,
    pub extras_total: f64,
    pub setup_total: f64,
}

/// Request to add an offer to the cart.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AddToCartRequest {
    pub offer_id: Uuid,

    #[validate(range(min = 1, max = 999, message = "quantity must be between 1 and 999"))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Request to change a line item's quantity.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateQuantityRequest {
    #[validate(range(min = 1, max = 999, message = "quantity must be between 1 and 999"))]
    pub quantity: i32,
}

/// One extra selection in a replace-extras request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ExtraSelection {
    pub extra_id: Uuid,

    #[validate(range(min = 1, max = 999, message = "quantity must be between 1 and 999"))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Request to replace a line item's selected extras.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SetItemExtrasRequest {
    #[validate(nested)]
    pub extras: Vec<ExtraSelection>,
}

/// Request to finalize the cart into a sent offer plate.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct FinalizeCartRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    #[serde(default = "default_plate_name")]
    pub name: String,

    /// Optional folder the sent plate is filed under.
    pub folder_id: Option<Uuid>,

    /// Required when the actor is an agent finalizing on a client's behalf.
    pub client_id: Option<Uuid>,
}

fn default_plate_name() -> String {
    "Plaquette d'offres".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_cart_defaults_quantity() {
        let json = format!(r#"{{"offer_id":"{}"}}"#, Uuid::nil());
        let req: AddToCartRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.quantity, 1);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_add_to_cart_rejects_zero_quantity() {
        let req = AddToCartRequest {
            offer_id: Uuid::nil(),
            quantity: 0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_quantity_bounds() {
        assert!(UpdateQuantityRequest { quantity: 1 }.validate().is_ok());
        assert!(UpdateQuantityRequest { quantity: 999 }.validate().is_ok());
        assert!(UpdateQuantityRequest { quantity: 0 }.validate().is_err());
        assert!(UpdateQuantityRequest { quantity: 1000 }.validate().is_err());
    }

    #[test]
    fn test_finalize_default_name() {
        let req: FinalizeCartRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.name, "Plaquette d'offres");
        assert!(req.folder_id.is_none());
        assert!(req.client_id.is_none());
    }

    #[test]
    fn test_set_extras_validates_nested() {
        let req = SetItemExtrasRequest {
            extras: vec![ExtraSelection {
                extra_id: Uuid::nil(),
                quantity: 0,
            }],
        };
        assert!(req.validate().is_err());
    }
}
