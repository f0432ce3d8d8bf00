//! Offer plate entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::offer_plate::{OfferPlate, OfferPlateStatus, OfferPlateSummary};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `offer_plate_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "offer_plate_status", rename_all = "lowercase")]
pub enum OfferPlateStatusDb {
    Draft,
    Sent,
    Accepted,
    Rejected,
}

impl From<OfferPlateStatusDb> for OfferPlateStatus {
    fn from(db_status: OfferPlateStatusDb) -> Self {
        match db_status {
            OfferPlateStatusDb::Draft => OfferPlateStatus::Draft,
            OfferPlateStatusDb::Sent => OfferPlateStatus::Sent,
            OfferPlateStatusDb::Accepted => OfferPlateStatus::Accepted,
            OfferPlateStatusDb::Rejected => OfferPlateStatus::Rejected,
        }
    }
}

impl From<OfferPlateStatus> for OfferPlateStatusDb {
    fn from(status: OfferPlateStatus) -> Self {
        match status {
            OfferPlateStatus::Draft => OfferPlateStatusDb::Draft,
            OfferPlateStatus::Sent => OfferPlateStatusDb::Sent,
            OfferPlateStatus::Accepted => OfferPlateStatusDb::Accepted,
            OfferPlateStatus::Rejected => OfferPlateStatusDb::Rejected,
        }
    }
}

/// Database row mapping for the offer_plates table.
#[derive(Debug, Clone, FromRow)]
pub struct OfferPlateEntity {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub status: OfferPlateStatusDb,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<OfferPlateEntity> for OfferPlate {
    fn from(entity: OfferPlateEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            client_id: entity.client_id,
            agent_id: entity.agent_id,
            folder_id: entity.folder_id,
            status: entity.status.into(),
            sent_at: entity.sent_at,
            created_at: entity.created_at,
        }
    }
}

/// Plate row with client identity and item count joined, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct OfferPlateSummaryEntity {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub status: OfferPlateStatusDb,
    pub created_at: DateTime<Utc>,
    // Client info
    pub client_first_name: Option<String>,
    pub client_last_name: Option<String>,
    pub client_email: String,
    pub item_count: i64,
}

impl OfferPlateSummaryEntity {
    fn client_name(&self) -> String {
        let name = match (&self.client_first_name, &self.client_last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        };
        if name.trim().is_empty() {
            self.client_email.clone()
        } else {
            name
        }
    }
}

impl From<OfferPlateSummaryEntity> for OfferPlateSummary {
    fn from(entity: OfferPlateSummaryEntity) -> Self {
        let client_name = entity.client_name();
        Self {
            id: entity.id,
            name: entity.name,
            client_id: entity.client_id,
            agent_id: entity.agent_id,
            folder_id: entity.folder_id,
            status: entity.status.into(),
            client_name,
            item_count: entity.item_count,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the offer_plate_items table.
#[derive(Debug, Clone, FromRow)]
pub struct PlateItemEntity {
    pub id: Uuid,
    pub offer_plate_id: Uuid,
    pub offer_id: Uuid,
    pub quantity: i32,
}

/// Plate item joined with its offer, for cart and plate detail reads.
#[derive(Debug, Clone, FromRow)]
pub struct PlateItemWithOfferEntity {
    pub id: Uuid,
    pub offer_plate_id: Uuid,
    pub offer_id: Uuid,
    pub quantity: i32,
    // Offer info
    pub offer_name: String,
    pub offer_description: Option<String>,
    pub price_monthly: f64,
    pub setup_fee: f64,
    pub category: String,
    pub image_url: Option<String>,
}

/// Selected extra joined with its catalog entry.
#[derive(Debug, Clone, FromRow)]
pub struct ItemExtraEntity {
    pub item_id: Uuid,
    pub extra_id: Uuid,
    pub quantity: i32,
    // Extra info
    pub extra_name: String,
    pub unit_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in [
            OfferPlateStatus::Draft,
            OfferPlateStatus::Sent,
            OfferPlateStatus::Accepted,
            OfferPlateStatus::Rejected,
        ] {
            let db: OfferPlateStatusDb = status.into();
            let back: OfferPlateStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_entity_to_model_mapping_is_lossless() {
        let entity = OfferPlateEntity {
            id: Uuid::new_v4(),
            name: "Plaquette Rakoto".to_string(),
            client_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            folder_id: Some(Uuid::new_v4()),
            status: OfferPlateStatusDb::Sent,
            sent_at: Some(Utc::now()),
            created_at: Utc::now(),
        };
        let model: OfferPlate = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.name, entity.name);
        assert_eq!(model.client_id, entity.client_id);
        assert_eq!(model.agent_id, entity.agent_id);
        assert_eq!(model.folder_id, entity.folder_id);
        assert_eq!(model.status, OfferPlateStatus::Sent);
        assert_eq!(model.sent_at, entity.sent_at);
        assert_eq!(model.created_at, entity.created_at);
    }

    #[test]
    fn test_summary_client_name_fallback() {
        let entity = OfferPlateSummaryEntity {
            id: Uuid::nil(),
            name: "Plaquette".to_string(),
            client_id: Uuid::nil(),
            agent_id: Uuid::nil(),
            folder_id: None,
            status: OfferPlateStatusDb::Sent,
            created_at: Utc::now(),
            client_first_name: None,
            client_last_name: None,
            client_email: "client@example.com".to_string(),
            item_count: 2,
        };
        let summary: OfferPlateSummary = entity.into();
        assert_eq!(summary.client_name, "client@example.com");
        assert_eq!(summary.item_count, 2);
    }
}
