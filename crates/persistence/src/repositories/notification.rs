//! Notification repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{NotificationEntity, NotificationTypeDb};
use crate::metrics::QueryTimer;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, content, type AS notification_type, read, link, created_at";

/// Repository for notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a notification row for one user.
    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        notification_type: NotificationTypeDb,
        link: Option<&str>,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, content, type, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(notification_type)
        .bind(link)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A user's notifications, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications");
        let result = sqlx::query_as::<_, NotificationEntity>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count of a user's unread notifications.
    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_unread_notifications");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = false",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark one notification as read, scoped to its owner.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_read");
        let result =
            sqlx::query("UPDATE notifications SET read = true WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Mark all of a user's unread notifications as read.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_all_notifications_read");
        let result =
            sqlx::query("UPDATE notifications SET read = true WHERE user_id = $1 AND read = false")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
