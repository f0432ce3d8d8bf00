//! Offer catalog entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::offer::{Offer, OfferExtra};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the offers table.
#[derive(Debug, Clone, FromRow)]
pub struct OfferEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_monthly: f64,
    pub setup_fee: f64,
    pub category: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl OfferEntity {
    /// Assembles the domain model from the row plus its feature list.
    pub fn into_model(self, features: Vec<String>) -> Offer {
        Offer {
            id: self.id,
            name: self.name,
            description: self.description,
            price_monthly: self.price_monthly,
            setup_fee: self.setup_fee,
            category: self.category,
            image_url: self.image_url,
            is_active: self.is_active,
            features,
            created_at: self.created_at,
        }
    }
}

/// Database row mapping for the offer_features table.
#[derive(Debug, Clone, FromRow)]
pub struct OfferFeatureEntity {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub feature: String,
}

/// Database row mapping for the offer_extras table.
#[derive(Debug, Clone, FromRow)]
pub struct OfferExtraEntity {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub name: String,
    pub unit_price: f64,
}

impl From<OfferExtraEntity> for OfferExtra {
    fn from(entity: OfferExtraEntity) -> Self {
        Self {
            id: entity.id,
            offer_id: entity.offer_id,
            name: entity.name,
            unit_price: entity.unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_model_mapping_is_lossless() {
        let entity = OfferEntity {
            id: Uuid::new_v4(),
            name: "Offre Standard".to_string(),
            description: Some("Pack internet de base".to_string()),
            price_monthly: 19.99,
            setup_fee: 49.0,
            category: "internet".to_string(),
            image_url: Some("https://cdn.example.com/standard.png".to_string()),
            is_active: true,
            created_at: Utc::now(),
        };
        let model = entity
            .clone()
            .into_model(vec!["Support 24/7".to_string()]);
        assert_eq!(model.id, entity.id);
        assert_eq!(model.name, entity.name);
        assert_eq!(model.description, entity.description);
        assert_eq!(model.price_monthly, 19.99);
        assert_eq!(model.setup_fee, entity.setup_fee);
        assert_eq!(model.category, entity.category);
        assert_eq!(model.image_url, entity.image_url);
        assert_eq!(model.is_active, entity.is_active);
        assert_eq!(model.features, vec!["Support 24/7".to_string()]);
        assert_eq!(model.created_at, entity.created_at);
    }

    #[test]
    fn test_extra_conversion() {
        let entity = OfferExtraEntity {
            id: Uuid::new_v4(),
            offer_id: Uuid::new_v4(),
            name: "Adresse IP fixe".to_string(),
            unit_price: 4.99,
        };
        let model: OfferExtra = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.offer_id, entity.offer_id);
        assert_eq!(model.name, entity.name);
        assert_eq!(model.unit_price, 4.99);
    }
}
