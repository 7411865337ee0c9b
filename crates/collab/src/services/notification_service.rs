//! Notification fan-out and read-state management.

use sqlx::SqlitePool;
use tracing::warn;

use clubhouse_database::{
    CreateNotificationRequest, Notification, NotificationKind, NotificationRepository,
    NotificationResult,
};

/// Service for notification fan-out and the per-recipient read state.
#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            notifications: NotificationRepository::new(pool),
        }
    }

    /// Durably enqueue one notification per recipient.
    ///
    /// Delivery is best-effort and independent per recipient: a failed
    /// insert is logged and skipped, never propagated to the triggering
    /// action. Returns the number of notifications actually written.
    pub async fn fan_out(
        &self,
        recipients: &[i64],
        kind: NotificationKind,
        message: &str,
        related: Option<(&str, &str)>,
    ) -> usize {
        let mut delivered = 0;

        for &recipient_id in recipients {
            let request = CreateNotificationRequest {
                recipient_id,
                kind,
                message: message.to_string(),
                related_entity_type: related.map(|(entity_type, _)| entity_type.to_string()),
                related_entity_id: related.map(|(_, entity_id)| entity_id.to_string()),
            };

            match self.notifications.create(&request).await {
                Ok(_) => delivered += 1,
                Err(e) => {
                    warn!(
                        recipient_id,
                        kind = kind.as_str(),
                        error = %e,
                        "failed to enqueue notification"
                    );
                }
            }
        }

        delivered
    }

    /// List an account's notifications, newest first, capped at 50.
    pub async fn list(&self, account_id: i64) -> NotificationResult<Vec<Notification>> {
        self.notifications.list_for_recipient(account_id).await
    }

    /// List an account's newest notifications with an explicit bound.
    pub async fn list_recent(
        &self,
        account_id: i64,
        limit: i64,
    ) -> NotificationResult<Vec<Notification>> {
        self.notifications
            .list_for_recipient_limited(account_id, limit)
            .await
    }

    /// Count an account's unread notifications.
    pub async fn unread_count(&self, account_id: i64) -> NotificationResult<i64> {
        self.notifications.unread_count(account_id).await
    }

    /// Mark one notification read. Recipient-scoped: someone else's
    /// notification is not found, never forbidden.
    pub async fn mark_read(&self, public_id: &str, account_id: i64) -> NotificationResult<()> {
        self.notifications.mark_read(public_id, account_id).await
    }

    /// Mark all of an account's unread notifications read.
    pub async fn mark_all_read(&self, account_id: i64) -> NotificationResult<u64> {
        self.notifications.mark_all_read(account_id).await
    }
}
