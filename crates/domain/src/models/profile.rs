//! User profile domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role attached to a profile. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Agent,
    Admin,
}

impl UserRole {
    /// Agents and admins manage folders, quotes and the client directory.
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Agent | UserRole::Admin)
    }

    /// Only admins manage the offer catalog.
    pub fn can_manage_catalog(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Client => write!(f, "client"),
            UserRole::Agent => write!(f, "agent"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// A user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// "First Last", falling back to the email when both names are empty.
    pub fn display_name(&self) -> String {
        let name = match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        };
        if name.trim().is_empty() {
            self.email.clone()
        } else {
            name
        }
    }
}

/// Client entry in the agent-facing directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClientSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: Option<&str>, last: Option<&str>) -> Profile {
        Profile {
            id: Uuid::nil(),
            email: "client@example.com".to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            phone: None,
            address: None,
            role: UserRole::Client,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_display() {
        assert_eq!(UserRole::Client.to_string(), "client");
        assert_eq!(UserRole::Agent.to_string(), "agent");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_role_permissions() {
        assert!(!UserRole::Client.is_staff());
        assert!(UserRole::Agent.is_staff());
        assert!(UserRole::Admin.is_staff());
        assert!(!UserRole::Agent.can_manage_catalog());
        assert!(UserRole::Admin.can_manage_catalog());
    }

    #[test]
    fn test_display_name_full() {
        assert_eq!(
            profile(Some("Nirina"), Some("Rakoto")).display_name(),
            "Nirina Rakoto"
        );
    }

    #[test]
    fn test_display_name_partial() {
        assert_eq!(profile(Some("Nirina"), None).display_name(), "Nirina");
        assert_eq!(profile(None, Some("Rakoto")).display_name(), "Rakoto");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(profile(None, None).display_name(), "client@example.com");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Agent).unwrap(), "\"agent\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }
}
