//! Notification routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use domain::models::notification::ListNotificationsResponse;
use persistence::repositories::NotificationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Response after marking all notifications read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// The actor's notifications, newest first, with an unread count.
///
/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ListNotificationsResponse>, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());
    let notifications = repo.list_for_user(actor.id).await?;
    let unread_count = repo.unread_count(actor.id).await?;

    Ok(Json(ListNotificationsResponse {
        data: notifications.into_iter().map(Into::into).collect(),
        unread_count,
    }))
}

/// Mark one notification as read.
///
/// POST /api/v1/notifications/:notification_id/read
pub async fn mark_read(
    State(state): State<AppState>,
    actor: Actor,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());
    let rows_affected = repo.mark_read(notification_id, actor.id).await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Mark all of the actor's unread notifications as read.
///
/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());
    let updated = repo.mark_all_read(actor.id).await?;

    Ok(Json(MarkAllReadResponse { updated }))
}
