//! Quote entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::quote::{PaymentStatus, Quote, QuoteStatus, QuoteSummary};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `quote_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "quote_status", rename_all = "lowercase")]
pub enum QuoteStatusDb {
    Pending,
    Approved,
    Sent,
    Accepted,
    Rejected,
}

impl From<QuoteStatusDb> for QuoteStatus {
    fn from(db_status: QuoteStatusDb) -> Self {
        match db_status {
            QuoteStatusDb::Pending => QuoteStatus::Pending,
            QuoteStatusDb::Approved => QuoteStatus::Approved,
            QuoteStatusDb::Sent => QuoteStatus::Sent,
            QuoteStatusDb::Accepted => QuoteStatus::Accepted,
            QuoteStatusDb::Rejected => QuoteStatus::Rejected,
        }
    }
}

impl From<QuoteStatus> for QuoteStatusDb {
    fn from(status: QuoteStatus) -> Self {
        match status {
            QuoteStatus::Pending => QuoteStatusDb::Pending,
            QuoteStatus::Approved => QuoteStatusDb::Approved,
            QuoteStatus::Sent => QuoteStatusDb::Sent,
            QuoteStatus::Accepted => QuoteStatusDb::Accepted,
            QuoteStatus::Rejected => QuoteStatusDb::Rejected,
        }
    }
}

/// Database enum that maps to the PostgreSQL `payment_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatusDb {
    Unpaid,
    Paid,
}

impl From<PaymentStatusDb> for PaymentStatus {
    fn from(db_status: PaymentStatusDb) -> Self {
        match db_status {
            PaymentStatusDb::Unpaid => PaymentStatus::Unpaid,
            PaymentStatusDb::Paid => PaymentStatus::Paid,
        }
    }
}

impl From<PaymentStatus> for PaymentStatusDb {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unpaid => PaymentStatusDb::Unpaid,
            PaymentStatus::Paid => PaymentStatusDb::Paid,
        }
    }
}

/// Database row mapping for the quotes table.
#[derive(Debug, Clone, FromRow)]
pub struct QuoteEntity {
    pub id: Uuid,
    pub reference: String,
    pub offer_plate_id: Uuid,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub total_amount: f64,
    pub status: QuoteStatusDb,
    pub payment_status: PaymentStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<QuoteEntity> for Quote {
    fn from(entity: QuoteEntity) -> Self {
        Self {
            id: entity.id,
            reference: entity.reference,
            offer_plate_id: entity.offer_plate_id,
            client_id: entity.client_id,
            agent_id: entity.agent_id,
            folder_id: entity.folder_id,
            total_amount: entity.total_amount,
            status: entity.status.into(),
            payment_status: entity.payment_status.into(),
            created_at: entity.created_at,
        }
    }
}

/// Quote row with plate name and client identity joined, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct QuoteSummaryEntity {
    pub id: Uuid,
    pub reference: String,
    pub offer_plate_id: Uuid,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub total_amount: f64,
    pub status: QuoteStatusDb,
    pub payment_status: PaymentStatusDb,
    pub created_at: DateTime<Utc>,
    // Joined info
    pub offer_plate_name: String,
    pub client_first_name: Option<String>,
    pub client_last_name: Option<String>,
    pub client_email: String,
}

impl From<QuoteSummaryEntity> for QuoteSummary {
    fn from(entity: QuoteSummaryEntity) -> Self {
        let client_name = match (&entity.client_first_name, &entity.client_last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => entity.client_email.clone(),
        };
        Self {
            id: entity.id,
            reference: entity.reference,
            offer_plate_id: entity.offer_plate_id,
            offer_plate_name: entity.offer_plate_name,
            client_id: entity.client_id,
            client_name,
            client_email: entity.client_email,
            agent_id: entity.agent_id,
            total_amount: entity.total_amount,
            status: entity.status.into(),
            payment_status: entity.payment_status.into(),
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in [
            QuoteStatus::Pending,
            QuoteStatus::Approved,
            QuoteStatus::Sent,
            QuoteStatus::Accepted,
            QuoteStatus::Rejected,
        ] {
            let db: QuoteStatusDb = status.into();
            let back: QuoteStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_payment_status_conversion_roundtrip() {
        for status in [PaymentStatus::Unpaid, PaymentStatus::Paid] {
            let db: PaymentStatusDb = status.into();
            let back: PaymentStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_entity_to_model_mapping_is_lossless() {
        let entity = QuoteEntity {
            id: Uuid::new_v4(),
            reference: "DEV-ABC234".to_string(),
            offer_plate_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            folder_id: None,
            total_amount: 19.99,
            status: QuoteStatusDb::Pending,
            payment_status: PaymentStatusDb::Unpaid,
            created_at: Utc::now(),
        };
        let model: Quote = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.reference, entity.reference);
        assert_eq!(model.offer_plate_id, entity.offer_plate_id);
        assert_eq!(model.client_id, entity.client_id);
        assert_eq!(model.agent_id, entity.agent_id);
        assert_eq!(model.total_amount, 19.99);
        assert_eq!(model.status, QuoteStatus::Pending);
        assert_eq!(model.payment_status, PaymentStatus::Unpaid);
        assert_eq!(model.created_at, entity.created_at);
    }

    #[test]
    fn test_summary_client_name_from_parts() {
        let entity = QuoteSummaryEntity {
            id: Uuid::nil(),
            reference: "DEV-XYZ789".to_string(),
            offer_plate_id: Uuid::nil(),
            client_id: Uuid::nil(),
            agent_id: Uuid::nil(),
            total_amount: 100.0,
            status: QuoteStatusDb::Sent,
            payment_status: PaymentStatusDb::Unpaid,
            created_at: Utc::now(),
            offer_plate_name: "Plaquette".to_string(),
            client_first_name: Some("Nirina".to_string()),
            client_last_name: None,
            client_email: "nirina@example.com".to_string(),
        };
        let summary: QuoteSummary = entity.into();
        assert_eq!(summary.client_name, "Nirina");
        assert_eq!(summary.offer_plate_name, "Plaquette");
    }
}
