//! Notification composition and delivery seam.
//!
//! Workflow transitions fan out per-user notifications. Delivery is
//! best-effort: a failed write is logged and never fails the transition
//! that produced it.

use uuid::Uuid;

use crate::models::notification::NotificationType;
use crate::models::quote::QuoteStatus;

/// A notification ready to be written for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub notification_type: NotificationType,
    pub link: Option<String>,
}

/// Notifies the client that an offer plate was sent to them.
pub fn plate_sent(client_id: Uuid, plate_name: &str) -> NotificationDraft {
    NotificationDraft {
        user_id: client_id,
        title: "Nouvelle plaquette d'offres".to_string(),
        content: format!("La plaquette « {} » vous a été envoyée.", plate_name),
        notification_type: NotificationType::Info,
        link: Some("/offer-plates".to_string()),
    }
}

/// Notifies the agent that a client's cart became a plate they now handle.
pub fn plate_assigned(agent_id: Uuid, plate_name: &str, client_name: &str) -> NotificationDraft {
    NotificationDraft {
        user_id: agent_id,
        title: "Plaquette à traiter".to_string(),
        content: format!(
            "La plaquette « {} » de {} attend votre traitement.",
            plate_name, client_name
        ),
        notification_type: NotificationType::Info,
        link: Some("/offer-plates".to_string()),
    }
}

/// Notifies the agent that the client decided on a sent plate.
pub fn plate_decided(agent_id: Uuid, plate_name: &str, accepted: bool) -> NotificationDraft {
    let (notification_type, label) = if accepted {
        (NotificationType::Success, "acceptée")
    } else {
        (NotificationType::Warning, "refusée")
    };
    NotificationDraft {
        user_id: agent_id,
        title: "Plaquette mise à jour".to_string(),
        content: format!("La plaquette « {} » a été {}.", plate_name, label),
        notification_type,
        link: Some("/offer-plates".to_string()),
    }
}

/// Notifies the client that a quote was created from their plate.
pub fn quote_created(client_id: Uuid, reference: &str, total_amount: f64) -> NotificationDraft {
    NotificationDraft {
        user_id: client_id,
        title: "Nouveau devis".to_string(),
        content: format!(
            "Le devis {} d'un montant de {:.2} € a été créé.",
            reference, total_amount
        ),
        notification_type: NotificationType::Info,
        link: Some("/quotes".to_string()),
    }
}

/// Notifies the counterpart of a quote status change.
pub fn quote_status_changed(
    user_id: Uuid,
    reference: &str,
    status: QuoteStatus,
) -> NotificationDraft {
    let (notification_type, label) = match status {
        QuoteStatus::Accepted => (NotificationType::Success, "accepté"),
        QuoteStatus::Rejected => (NotificationType::Warning, "refusé"),
        QuoteStatus::Approved => (NotificationType::Info, "approuvé"),
        QuoteStatus::Sent => (NotificationType::Info, "envoyé"),
        QuoteStatus::Pending => (NotificationType::Info, "en attente"),
    };
    NotificationDraft {
        user_id,
        title: "Devis mis à jour".to_string(),
        content: format!("Le devis {} est maintenant {}.", reference, label),
        notification_type,
        link: Some("/quotes".to_string()),
    }
}

/// Notifies a party that a quote was paid.
pub fn quote_paid(user_id: Uuid, reference: &str) -> NotificationDraft {
    NotificationDraft {
        user_id,
        title: "Paiement reçu".to_string(),
        content: format!("Le paiement du devis {} a été confirmé.", reference),
        notification_type: NotificationType::Success,
        link: Some("/quotes".to_string()),
    }
}

/// Delivery seam for notification drafts.
///
/// Returns whether the write succeeded. Implementations must not propagate
/// errors; callers treat `false` as "logged and dropped".
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, draft: NotificationDraft) -> bool;
}

/// In-memory sink for tests: records drafts, optionally simulating failure.
#[derive(Debug, Default)]
pub struct MockNotificationSink {
    pub simulate_failure: bool,
    delivered: std::sync::Mutex<Vec<NotificationDraft>>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            delivered: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Drafts delivered so far, in order.
    pub fn delivered(&self) -> Vec<NotificationDraft> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NotificationSink for MockNotificationSink {
    async fn deliver(&self, draft: NotificationDraft) -> bool {
        if self.simulate_failure {
            tracing::warn!(user_id = %draft.user_id, "mock sink simulating delivery failure");
            return false;
        }
        self.delivered.lock().unwrap().push(draft);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_sent_targets_client() {
        let client_id = Uuid::new_v4();
        let draft = plate_sent(client_id, "Ma plaquette");
        assert_eq!(draft.user_id, client_id);
        assert!(draft.content.contains("Ma plaquette"));
        assert_eq!(draft.notification_type, NotificationType::Info);
        assert_eq!(draft.link.as_deref(), Some("/offer-plates"));
    }

    #[test]
    fn test_quote_created_formats_amount() {
        let draft = quote_created(Uuid::nil(), "DEV-ABC234", 129.5);
        assert!(draft.content.contains("DEV-ABC234"));
        assert!(draft.content.contains("129.50"));
    }

    #[test]
    fn test_quote_status_changed_types() {
        let accepted = quote_status_changed(Uuid::nil(), "DEV-X", QuoteStatus::Accepted);
        assert_eq!(accepted.notification_type, NotificationType::Success);

        let rejected = quote_status_changed(Uuid::nil(), "DEV-X", QuoteStatus::Rejected);
        assert_eq!(rejected.notification_type, NotificationType::Warning);

        let approved = quote_status_changed(Uuid::nil(), "DEV-X", QuoteStatus::Approved);
        assert_eq!(approved.notification_type, NotificationType::Info);
    }

    #[test]
    fn test_quote_paid_is_success() {
        let draft = quote_paid(Uuid::nil(), "DEV-ABC234");
        assert_eq!(draft.notification_type, NotificationType::Success);
        assert!(draft.content.contains("DEV-ABC234"));
    }

    #[tokio::test]
    async fn test_mock_sink_records_deliveries() {
        let sink = MockNotificationSink::new();
        let draft = plate_sent(Uuid::nil(), "Plaquette");
        assert!(sink.deliver(draft.clone()).await);
        assert_eq!(sink.delivered(), vec![draft]);
    }

    #[tokio::test]
    async fn test_mock_sink_failure_mode() {
        let sink = MockNotificationSink::failing();
        let draft = quote_paid(Uuid::nil(), "DEV-X");
        assert!(!sink.deliver(draft).await);
        assert!(sink.delivered().is_empty());
    }
}
