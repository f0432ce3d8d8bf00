//! Offer plate domain models and status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Status of an offer plate.
///
/// A plate begins life as the client's cart (`draft`) and is finalized into
/// `sent`; the client then accepts or rejects it. There is no edge back to
/// draft and terminal states have no outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferPlateStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
}

impl OfferPlateStatus {
    /// Transition table: draft → sent → {accepted, rejected}.
    pub fn can_transition_to(self, next: OfferPlateStatus) -> bool {
        use OfferPlateStatus::*;
        matches!((self, next), (Draft, Sent) | (Sent, Accepted) | (Sent, Rejected))
    }

    /// Validates a transition, returning the rejected edge on failure.
    pub fn transition_to(self, next: OfferPlateStatus) -> Result<OfferPlateStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                entity: "offer plate",
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl std::fmt::Display for OfferPlateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferPlateStatus::Draft => write!(f, "draft"),
            OfferPlateStatus::Sent => write!(f, "sent"),
            OfferPlateStatus::Accepted => write!(f, "accepted"),
            OfferPlateStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// An illegal status transition, rejected instead of silently applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("illegal {entity} status transition: {from} -> {to}")]
pub struct TransitionError {
    pub entity: &'static str,
    pub from: String,
    pub to: String,
}

/// A named bundle of offers proposed to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OfferPlate {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub status: OfferPlateStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Plate entry in role-gated listings, with the client's display name joined.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OfferPlateSummary {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub status: OfferPlateStatus,
    pub client_name: String,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A plate line item joined with its offer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OfferPlateItem {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub offer_name: String,
    pub price_monthly: f64,
    pub setup_fee: f64,
    pub quantity: i32,
    pub extras: Vec<super::cart::SelectedExtra>,
}

/// Full plate detail: the plate plus its items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OfferPlateDetail {
    #[serde(flatten)]
    pub plate: OfferPlate,
    pub items: Vec<OfferPlateItem>,
}

/// Request to change a plate's status.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdatePlateStatusRequest {
    pub status: OfferPlateStatus,
}

/// Response for role-gated plate listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListOfferPlatesResponse {
    pub data: Vec<OfferPlateSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(OfferPlateStatus::Draft.to_string(), "draft");
        assert_eq!(OfferPlateStatus::Sent.to_string(), "sent");
        assert_eq!(OfferPlateStatus::Accepted.to_string(), "accepted");
        assert_eq!(OfferPlateStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_legal_transitions() {
        use OfferPlateStatus::*;
        assert!(Draft.can_transition_to(Sent));
        assert!(Sent.can_transition_to(Accepted));
        assert!(Sent.can_transition_to(Rejected));
    }

    #[test]
    fn test_illegal_transitions() {
        use OfferPlateStatus::*;
        assert!(!Sent.can_transition_to(Draft));
        assert!(!Draft.can_transition_to(Accepted));
        assert!(!Draft.can_transition_to(Rejected));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Sent));
        // No self loops either
        assert!(!Sent.can_transition_to(Sent));
    }

    #[test]
    fn test_transition_error_message() {
        let err = OfferPlateStatus::Sent
            .transition_to(OfferPlateStatus::Draft)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "illegal offer plate status transition: sent -> draft"
        );
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&OfferPlateStatus::Sent).unwrap(),
            "\"sent\""
        );
        let status: OfferPlateStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(status, OfferPlateStatus::Draft);
    }

    #[test]
    fn test_unknown_status_rejected_at_deserialization() {
        let result: Result<OfferPlateStatus, _> = serde_json::from_str("\"archived\"");
        assert!(result.is_err());
    }
}
