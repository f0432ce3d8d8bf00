//! Database-backed notification sink.
//!
//! Writes workflow notifications through the repository. Delivery is
//! best-effort: failures are logged at warn level and reported as `false`,
//! never propagated to the workflow transition that produced the draft.

use sqlx::PgPool;
use tracing::warn;

use domain::services::notification::{NotificationDraft, NotificationSink};
use persistence::repositories::NotificationRepository;

/// Notification sink persisting drafts to the notifications table.
#[derive(Clone)]
pub struct PgNotificationSink {
    repo: NotificationRepository,
}

impl PgNotificationSink {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: NotificationRepository::new(pool),
        }
    }

    /// Deliver a batch of drafts, returning how many were written.
    pub async fn deliver_all(&self, drafts: Vec<NotificationDraft>) -> usize {
        let mut delivered = 0;
        for draft in drafts {
            if self.deliver(draft).await {
                delivered += 1;
            }
        }
        delivered
    }
}

#[async_trait::async_trait]
impl NotificationSink for PgNotificationSink {
    async fn deliver(&self, draft: NotificationDraft) -> bool {
        let result = self
            .repo
            .create(
                draft.user_id,
                &draft.title,
                &draft.content,
                draft.notification_type.into(),
                draft.link.as_deref(),
            )
            .await;

        match result {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    user_id = %draft.user_id,
                    title = %draft.title,
                    error = %err,
                    "Failed to write notification"
                );
                false
            }
        }
    }
}
