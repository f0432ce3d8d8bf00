//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::profile::{ClientSummary, Profile, UserRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `user_role` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    Client,
    Agent,
    Admin,
}

impl From<UserRoleDb> for UserRole {
    fn from(db_role: UserRoleDb) -> Self {
        match db_role {
            UserRoleDb::Client => UserRole::Client,
            UserRoleDb::Agent => UserRole::Agent,
            UserRoleDb::Admin => UserRole::Admin,
        }
    }
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Client => UserRoleDb::Client,
            UserRole::Agent => UserRoleDb::Agent,
            UserRole::Admin => UserRoleDb::Admin,
        }
    }
}

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRoleDb,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone: entity.phone,
            address: entity.address,
            role: entity.role.into(),
            created_at: entity.created_at,
        }
    }
}

impl From<ProfileEntity> for ClientSummary {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone: entity.phone,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion_roundtrip() {
        for role in [UserRole::Client, UserRole::Agent, UserRole::Admin] {
            let db: UserRoleDb = role.into();
            let back: UserRole = db.into();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_entity_to_model_mapping_is_lossless() {
        let entity = ProfileEntity {
            id: Uuid::new_v4(),
            email: "agent@i-numa.mg".to_string(),
            first_name: Some("Hery".to_string()),
            last_name: Some("Andria".to_string()),
            phone: Some("+261340000000".to_string()),
            address: Some("Antananarivo".to_string()),
            role: UserRoleDb::Agent,
            created_at: Utc::now(),
        };
        let model: Profile = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.email, entity.email);
        assert_eq!(model.first_name, entity.first_name);
        assert_eq!(model.last_name, entity.last_name);
        assert_eq!(model.phone, entity.phone);
        assert_eq!(model.address, entity.address);
        assert_eq!(model.role, UserRole::Agent);
        assert_eq!(model.created_at, entity.created_at);
    }
}
