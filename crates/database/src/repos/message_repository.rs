//! Message repository: a group's append-only message log.

use crate::entities::Message;
use crate::types::{GroupResult, GroupError};
use sqlx::{SqlitePool, Row};
use tracing::info;

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_message(row: &sqlx::sqlite::SqliteRow) -> Message {
        Message {
            id: row.get("id"),
            public_id: row.get("public_id"),
            group_id: row.get("group_id"),
            sender_id: row.get("sender_id"),
            sender_name: row.get("sender_name"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        }
    }

    /// Append a message. `sender_name` is the sender's display name captured
    /// at this instant; it is stored as-is and never refreshed.
    pub async fn create(
        &self,
        group_id: i64,
        sender_id: i64,
        sender_name: &str,
        content: &str,
    ) -> GroupResult<Message> {
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO messages (public_id, group_id, sender_id, sender_name, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(group_id)
        .bind(sender_id)
        .bind(sender_name)
        .bind(content)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        let message_id = result.last_insert_rowid();

        info!(
            message_id,
            public_id = %public_id,
            group_id,
            sender_id,
            "created new message"
        );

        Ok(Message {
            id: message_id,
            public_id,
            group_id,
            sender_id,
            sender_name: sender_name.to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }

    /// Fetch the newest `limit` messages of a group, newest first. Callers
    /// wanting chronological order reverse the result.
    pub async fn list_recent(&self, group_id: i64, limit: i64) -> GroupResult<Vec<Message>> {
        let rows = sqlx::query(
            "SELECT id, public_id, group_id, sender_id, sender_name, content, created_at
             FROM messages WHERE group_id = ?
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(group_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        Ok(rows.iter().map(Self::map_message).collect())
    }

    /// Purge every message of a group. Returns the number of rows removed.
    pub async fn delete_by_group(&self, group_id: i64) -> GroupResult<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE group_id = ?")
            .bind(group_id)
            .execute(&self.pool)
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        let purged = result.rows_affected();
        if purged > 0 {
            info!(group_id, purged, "purged group messages");
        }
        Ok(purged)
    }

    /// Count messages in a group.
    pub async fn count_by_group(&self, group_id: i64) -> GroupResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))
    }
}
