//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::notification::{Notification, NotificationType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `notification_type` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
pub enum NotificationTypeDb {
    Info,
    Success,
    Warning,
    Error,
}

impl From<NotificationTypeDb> for NotificationType {
    fn from(db_type: NotificationTypeDb) -> Self {
        match db_type {
            NotificationTypeDb::Info => NotificationType::Info,
            NotificationTypeDb::Success => NotificationType::Success,
            NotificationTypeDb::Warning => NotificationType::Warning,
            NotificationTypeDb::Error => NotificationType::Error,
        }
    }
}

impl From<NotificationType> for NotificationTypeDb {
    fn from(notification_type: NotificationType) -> Self {
        match notification_type {
            NotificationType::Info => NotificationTypeDb::Info,
            NotificationType::Success => NotificationTypeDb::Success,
            NotificationType::Warning => NotificationTypeDb::Warning,
            NotificationType::Error => NotificationTypeDb::Error,
        }
    }
}

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    /// Selected as `type AS notification_type`; `type` is the column name.
    pub notification_type: NotificationTypeDb,
    pub read: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for Notification {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            title: entity.title,
            content: entity.content,
            notification_type: entity.notification_type.into(),
            read: entity.read,
            link: entity.link,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_conversion_roundtrip() {
        for notification_type in [
            NotificationType::Info,
            NotificationType::Success,
            NotificationType::Warning,
            NotificationType::Error,
        ] {
            let db: NotificationTypeDb = notification_type.into();
            let back: NotificationType = db.into();
            assert_eq!(back, notification_type);
        }
    }

    #[test]
    fn test_entity_to_model_mapping_is_lossless() {
        let entity = NotificationEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Nouveau devis".to_string(),
            content: "Le devis DEV-ABC234 a été créé.".to_string(),
            notification_type: NotificationTypeDb::Success,
            read: false,
            link: Some("/quotes".to_string()),
            created_at: Utc::now(),
        };
        let model: Notification = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.user_id, entity.user_id);
        assert_eq!(model.title, entity.title);
        assert_eq!(model.content, entity.content);
        assert_eq!(model.notification_type, NotificationType::Success);
        assert_eq!(model.read, entity.read);
        assert_eq!(model.link, entity.link);
        assert_eq!(model.created_at, entity.created_at);
    }
}
