//! Payment info entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::payment::PaymentInfo;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the payment_info table.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentInfoEntity {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub bank_name: String,
    pub iban: String,
    pub bic: String,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentInfoEntity> for PaymentInfo {
    fn from(entity: PaymentInfoEntity) -> Self {
        Self {
            id: entity.id,
            quote_id: entity.quote_id,
            bank_name: entity.bank_name,
            iban: entity.iban,
            bic: entity.bic,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_model_mapping_is_lossless() {
        let entity = PaymentInfoEntity {
            id: Uuid::new_v4(),
            quote_id: Uuid::new_v4(),
            bank_name: "BNI Madagascar".to_string(),
            iban: "MG4600005030071289421016045".to_string(),
            bic: "BNIMMGMG".to_string(),
            created_at: Utc::now(),
        };
        let model: PaymentInfo = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.quote_id, entity.quote_id);
        assert_eq!(model.bank_name, entity.bank_name);
        assert_eq!(model.iban, entity.iban);
        assert_eq!(model.bic, entity.bic);
        assert_eq!(model.created_at, entity.created_at);
    }
}
