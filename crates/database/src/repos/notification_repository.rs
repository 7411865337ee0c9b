//! Notification repository for database operations.

use crate::entities::{Notification, NotificationKind, CreateNotificationRequest};
use crate::types::{NotificationResult, NotificationError};
use sqlx::{SqlitePool, Row};

/// Notifications returned per listing call.
const LIST_CAP: i64 = 50;

/// Repository for notification database operations
#[derive(Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Create a new notification repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_notification(row: &sqlx::sqlite::SqliteRow) -> NotificationResult<Notification> {
        let kind_str: String = row.get("kind");
        Ok(Notification {
            id: row.get("id"),
            public_id: row.get("public_id"),
            recipient_id: row.get("recipient_id"),
            kind: kind_str
                .parse()
                .map_err(|_| NotificationError::InvalidKind)?,
            message: row.get("message"),
            related_entity_id: row.get("related_entity_id"),
            related_entity_type: row.get("related_entity_type"),
            is_read: row.get("is_read"),
            created_at: row.get("created_at"),
        })
    }

    /// Append one notification, unread, stamped now.
    pub async fn create(&self, request: &CreateNotificationRequest) -> NotificationResult<Notification> {
        let now = chrono::Utc::now().to_rfc3339();
        let public_id = cuid2::cuid();

        let result = sqlx::query(
            "INSERT INTO notifications (public_id, recipient_id, kind, message, related_entity_id, related_entity_type, is_read, created_at)
             VALUES (?, ?, ?, ?, ?, ?, false, ?)",
        )
        .bind(&public_id)
        .bind(request.recipient_id)
        .bind(request.kind.to_string())
        .bind(&request.message)
        .bind(&request.related_entity_id)
        .bind(&request.related_entity_type)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        Ok(Notification {
            id: result.last_insert_rowid(),
            public_id,
            recipient_id: request.recipient_id,
            kind: request.kind,
            message: request.message.clone(),
            related_entity_id: request.related_entity_id.clone(),
            related_entity_type: request.related_entity_type.clone(),
            is_read: false,
            created_at: now,
        })
    }

    /// List a recipient's notifications, newest first, capped at 50.
    pub async fn list_for_recipient(&self, recipient_id: i64) -> NotificationResult<Vec<Notification>> {
        self.list_for_recipient_limited(recipient_id, LIST_CAP).await
    }

    /// List a recipient's newest notifications with an explicit bound.
    pub async fn list_for_recipient_limited(
        &self,
        recipient_id: i64,
        limit: i64,
    ) -> NotificationResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, public_id, recipient_id, kind, message, related_entity_id, related_entity_type, is_read, created_at
             FROM notifications WHERE recipient_id = ?
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(recipient_id)
        .bind(limit.min(LIST_CAP))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::map_notification).collect()
    }

    /// Count a recipient's unread notifications.
    pub async fn unread_count(&self, recipient_id: i64) -> NotificationResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND is_read = false",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| NotificationError::DatabaseError(e.to_string()))
    }

    /// Mark one notification read.
    ///
    /// The update is recipient-scoped: a notification belonging to someone
    /// else is simply not found, never reported as forbidden.
    pub async fn mark_read(&self, public_id: &str, recipient_id: i64) -> NotificationResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE public_id = ? AND recipient_id = ?",
        )
        .bind(public_id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(NotificationError::NotificationNotFound);
        }

        Ok(())
    }

    /// Mark every unread notification of a recipient read. Returns the
    /// number of rows flipped.
    pub async fn mark_all_read(&self, recipient_id: i64) -> NotificationResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE recipient_id = ? AND is_read = false",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
