//! Notification domain models.
//!
//! Notifications are side-effect rows created during workflow transitions
//! and displayed per user. They are never deduplicated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity/kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    /// Maps a stored string to a type, defaulting unknown values to `Info`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "success" => NotificationType::Success,
            "warning" => NotificationType::Warning,
            "error" => NotificationType::Error,
            _ => NotificationType::Info,
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Info => write!(f, "info"),
            NotificationType::Success => write!(f, "success"),
            NotificationType::Warning => write!(f, "warning"),
            NotificationType::Error => write!(f, "error"),
        }
    }
}

/// A notification row targeting one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub read: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response for the notification listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListNotificationsResponse {
    pub data: Vec<Notification>,
    pub unread_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(NotificationType::Info.to_string(), "info");
        assert_eq!(NotificationType::Success.to_string(), "success");
        assert_eq!(NotificationType::Warning.to_string(), "warning");
        assert_eq!(NotificationType::Error.to_string(), "error");
    }

    #[test]
    fn test_parse_lenient_defaults_to_info() {
        assert_eq!(
            NotificationType::parse_lenient("success"),
            NotificationType::Success
        );
        assert_eq!(
            NotificationType::parse_lenient("warning"),
            NotificationType::Warning
        );
        assert_eq!(
            NotificationType::parse_lenient("error"),
            NotificationType::Error
        );
        assert_eq!(
            NotificationType::parse_lenient("anything-else"),
            NotificationType::Info
        );
        assert_eq!(NotificationType::parse_lenient(""), NotificationType::Info);
    }

    #[test]
    fn test_notification_type_field_serializes_as_type() {
        let notification = Notification {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            title: "Nouveau devis".to_string(),
            content: "Le devis DEV-ABC234 vous attend.".to_string(),
            notification_type: NotificationType::Info,
            read: false,
            link: Some("/quotes".to_string()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("\"type\":\"info\""));
        assert!(json.contains("\"read\":false"));
    }
}
