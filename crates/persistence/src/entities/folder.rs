//! Folder entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::folder::{Folder, FolderSummary};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the folders table.
#[derive(Debug, Clone, FromRow)]
pub struct FolderEntity {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<FolderEntity> for Folder {
    fn from(entity: FolderEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            client_id: entity.client_id,
            agent_id: entity.agent_id,
            created_at: entity.created_at,
        }
    }
}

/// Folder row with client identity and content counts joined.
#[derive(Debug, Clone, FromRow)]
pub struct FolderSummaryEntity {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub created_at: DateTime<Utc>,
    // Joined info
    pub client_first_name: Option<String>,
    pub client_last_name: Option<String>,
    pub client_email: String,
    pub plate_count: i64,
    pub quote_count: i64,
}

impl From<FolderSummaryEntity> for FolderSummary {
    fn from(entity: FolderSummaryEntity) -> Self {
        let client_name = match (&entity.client_first_name, &entity.client_last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => entity.client_email.clone(),
        };
        Self {
            id: entity.id,
            name: entity.name,
            client_id: entity.client_id,
            client_name,
            agent_id: entity.agent_id,
            plate_count: entity.plate_count,
            quote_count: entity.quote_count,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_model_mapping_is_lossless() {
        let entity = FolderEntity {
            id: Uuid::new_v4(),
            name: "Dossier Rakoto".to_string(),
            client_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let model: Folder = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.name, entity.name);
        assert_eq!(model.client_id, entity.client_id);
        assert_eq!(model.agent_id, entity.agent_id);
        assert_eq!(model.created_at, entity.created_at);
    }
}
