//! Notification Service - per-user inbox and fan-out helpers

use crate::domain::{DomainError, NewNotification, NotificationType};
use crate::infrastructure::AppState;
use crate::models::notification;

/// Record one notification for one user
pub async fn notify_user(
    state: &AppState,
    user_id: i32,
    family_id: Option<i32>,
    kind: NotificationType,
    title: impl Into<String>,
    message: impl Into<String>,
) -> Result<notification::Model, DomainError> {
    state
        .notifications
        .create(NewNotification {
            user_id,
            family_id,
            notification_type: kind,
            title: title.into(),
            message: message.into(),
        })
        .await
}

/// Send the same notification to every member, optionally skipping one user
pub async fn notify_family(
    state: &AppState,
    family_id: i32,
    except: Option<i32>,
    kind: NotificationType,
    title: &str,
    message: &str,
) -> Result<usize, DomainError> {
    let members = state.families.member_ids(family_id).await?;
    let mut sent = 0;

    for user_id in members.into_iter().filter(|id| Some(*id) != except) {
        notify_user(state, user_id, Some(family_id), kind, title, message).await?;
        sent += 1;
    }

    tracing::debug!("Sent {} '{}' notification(s) to family {}", sent, kind, family_id);
    Ok(sent)
}

pub async fn list_notifications(
    state: &AppState,
    user_id: i32,
    unread_only: bool,
) -> Result<Vec<notification::Model>, DomainError> {
    state.notifications.list_for_user(user_id, unread_only).await
}

pub async fn unread_count(state: &AppState, user_id: i32) -> Result<u64, DomainError> {
    state.notifications.count_unread(user_id).await
}

/// Another user's notification is reported as missing
async fn owned(
    state: &AppState,
    id: i32,
    user_id: i32,
) -> Result<notification::Model, DomainError> {
    match state.notifications.find_by_id(id).await? {
        Some(n) if n.user_id == user_id => Ok(n),
        _ => Err(DomainError::not_found("Notification")),
    }
}

pub async fn mark_read(
    state: &AppState,
    id: i32,
    user_id: i32,
) -> Result<notification::Model, DomainError> {
    let existing = owned(state, id, user_id).await?;
    if existing.is_read {
        return Ok(existing);
    }
    state.notifications.mark_read(id).await
}

pub async fn mark_all_read(state: &AppState, user_id: i32) -> Result<u64, DomainError> {
    state.notifications.mark_all_read(user_id).await
}

pub async fn delete_notification(
    state: &AppState,
    id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    owned(state, id, user_id).await?;
    state.notifications.delete(id).await
}
