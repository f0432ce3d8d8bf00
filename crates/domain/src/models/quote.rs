//! Quote domain models and status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::offer_plate::TransitionError;

/// Status of a quote.
///
/// A quote moves pending → approved → sent → {accepted, rejected}. No state
/// skipping, no reversals; terminal states have no outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Approved,
    Sent,
    Accepted,
    Rejected,
}

impl QuoteStatus {
    /// Transition table: pending → approved → sent → {accepted, rejected}.
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Approved, Sent) | (Sent, Accepted) | (Sent, Rejected)
        )
    }

    /// Validates a transition, returning the rejected edge on failure.
    pub fn transition_to(self, next: QuoteStatus) -> Result<QuoteStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                entity: "quote",
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    /// Clients only decide the outcome of a sent quote; the rest of the
    /// lifecycle is driven by agents and admins.
    pub fn settable_by_client(self) -> bool {
        matches!(self, QuoteStatus::Accepted | QuoteStatus::Rejected)
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteStatus::Pending => write!(f, "pending"),
            QuoteStatus::Approved => write!(f, "approved"),
            QuoteStatus::Sent => write!(f, "sent"),
            QuoteStatus::Accepted => write!(f, "accepted"),
            QuoteStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Whether a quote has been paid through the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::Paid => write!(f, "paid"),
        }
    }
}

/// A priced, stateful commercial document generated from a sent offer plate.
///
/// The total amount is computed once at creation and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Quote {
    pub id: Uuid,
    pub reference: String,
    pub offer_plate_id: Uuid,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub total_amount: f64,
    pub status: QuoteStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// Quote entry in role-gated listings, joined with plate and client info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuoteSummary {
    pub id: Uuid,
    pub reference: String,
    pub offer_plate_id: Uuid,
    pub offer_plate_name: String,
    pub client_id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub agent_id: Uuid,
    pub total_amount: f64,
    pub status: QuoteStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// One-time charges reported alongside the recurring total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuoteBreakdown {
    pub monthly_total: f64,
    pub extras_total: f64,
    pub setup_total: f64,
}

/// Full quote detail: the quote, its pricing breakdown and the plate items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub breakdown: QuoteBreakdown,
    pub items: Vec<super::offer_plate::OfferPlateItem>,
}

/// Request to create a quote from a sent offer plate (agent/admin only).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateQuoteRequest {
    pub offer_plate_id: Uuid,
    pub folder_id: Option<Uuid>,
}

/// Request to change a quote's status.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}

/// Response for role-gated quote listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListQuotesResponse {
    pub data: Vec<QuoteSummary>,
}

/// Generates a human-readable quote reference: DEV-XXXXXX.
///
/// Avoids confusable characters (0/O, 1/I) in the random segment.
pub fn generate_quote_reference() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let chars: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

    let segment: String = (0..6)
        .map(|_| {
            let idx = rng.gen_range(0..chars.len());
            chars[idx] as char
        })
        .collect();

    format!("DEV-{}", segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(QuoteStatus::Pending.to_string(), "pending");
        assert_eq!(QuoteStatus::Approved.to_string(), "approved");
        assert_eq!(QuoteStatus::Sent.to_string(), "sent");
        assert_eq!(QuoteStatus::Accepted.to_string(), "accepted");
        assert_eq!(QuoteStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_legal_transitions() {
        use QuoteStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Sent));
        assert!(Sent.can_transition_to(Accepted));
        assert!(Sent.can_transition_to(Rejected));
    }

    #[test]
    fn test_no_state_skipping() {
        use QuoteStatus::*;
        assert!(!Pending.can_transition_to(Sent));
        assert!(!Pending.can_transition_to(Accepted));
        assert!(!Approved.can_transition_to(Accepted));
        assert!(!Approved.can_transition_to(Rejected));
    }

    #[test]
    fn test_no_reversals_or_terminal_exits() {
        use QuoteStatus::*;
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Sent.can_transition_to(Approved));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Pending));
    }

    #[test]
    fn test_transition_error_names_the_edge() {
        let err = QuoteStatus::Pending
            .transition_to(QuoteStatus::Sent)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "illegal quote status transition: pending -> sent"
        );
    }

    #[test]
    fn test_client_settable_statuses() {
        assert!(QuoteStatus::Accepted.settable_by_client());
        assert!(QuoteStatus::Rejected.settable_by_client());
        assert!(!QuoteStatus::Approved.settable_by_client());
        assert!(!QuoteStatus::Sent.settable_by_client());
    }

    #[test]
    fn test_payment_status_display() {
        assert_eq!(PaymentStatus::Unpaid.to_string(), "unpaid");
        assert_eq!(PaymentStatus::Paid.to_string(), "paid");
    }

    #[test]
    fn test_generate_quote_reference_format() {
        let reference = generate_quote_reference();
        assert_eq!(reference.len(), 10);
        assert!(reference.starts_with("DEV-"));
        for c in reference[4..].chars() {
            assert!(c.is_ascii_uppercase() || c.is_ascii_digit(), "bad char {}", c);
            assert!(c != 'O' && c != 'I' && c != '0' && c != '1');
        }
    }

    #[test]
    fn test_generate_quote_reference_uniqueness() {
        let refs: Vec<String> = (0..100).map(|_| generate_quote_reference()).collect();
        let unique: std::collections::HashSet<_> = refs.iter().collect();
        assert!(unique.len() >= 99);
    }

    #[test]
    fn test_unknown_status_rejected_at_deserialization() {
        let result: Result<UpdateQuoteStatusRequest, _> =
            serde_json::from_str(r#"{"status":"archived"}"#);
        assert!(result.is_err());
    }
}
