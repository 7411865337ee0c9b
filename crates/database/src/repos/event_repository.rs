//! Event repository: event records and the attend/decline state machine.

use crate::entities::{Event, AttendanceStatus, CreateEventRecord, UpdateEventRequest};
use crate::types::{EventResult, EventError};
use sqlx::{SqlitePool, Row};
use tracing::info;

const EVENT_COLUMNS: &str = "id, public_id, title, description, event_date, event_time, location, group_id, capacity, created_by, created_at";

/// Repository for event database operations
#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    /// Create a new event repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_responses(&self, event_id: i64) -> EventResult<(Vec<String>, Vec<String>)> {
        let rows = sqlx::query(
            "SELECT a.public_id, r.status FROM event_responses r
             JOIN accounts a ON a.id = r.account_id
             WHERE r.event_id = ? ORDER BY r.updated_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        let mut attendees = Vec::new();
        let mut declined = Vec::new();
        for row in rows {
            let public_id: String = row.get("public_id");
            let status: String = row.get("status");
            match AttendanceStatus::from(status.as_str()) {
                AttendanceStatus::Attending => attendees.push(public_id),
                AttendanceStatus::Declined => declined.push(public_id),
            }
        }
        Ok((attendees, declined))
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> Event {
        Event {
            id: row.get("id"),
            public_id: row.get("public_id"),
            title: row.get("title"),
            description: row.get("description"),
            date: row.get("event_date"),
            time: row.get("event_time"),
            location: row.get("location"),
            group_id: row.get("group_id"),
            capacity: row.get("capacity"),
            created_by: row.get("created_by"),
            attendees: Vec::new(),
            declined: Vec::new(),
            created_at: row.get("created_at"),
        }
    }

    async fn attach_responses(&self, mut event: Event) -> EventResult<Event> {
        let (attendees, declined) = self.load_responses(event.id).await?;
        event.attendees = attendees;
        event.declined = declined;
        Ok(event)
    }

    /// Create a new event
    pub async fn create(&self, created_by: i64, record: &CreateEventRecord) -> EventResult<Event> {
        let now = chrono::Utc::now().to_rfc3339();
        let public_id = cuid2::cuid();

        let result = sqlx::query(
            "INSERT INTO events (public_id, title, description, event_date, event_time, location, group_id, capacity, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.date)
        .bind(&record.time)
        .bind(&record.location)
        .bind(record.group_id)
        .bind(record.capacity)
        .bind(created_by)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        let event_id = result.last_insert_rowid();

        info!(event_id, public_id = %public_id, created_by, "created new event");

        self.find_by_id(event_id).await?.ok_or_else(|| {
            EventError::DatabaseError("Failed to retrieve created event".to_string())
        })
    }

    /// Find event by internal ID
    pub async fn find_by_id(&self, id: i64) -> EventResult<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        match row.as_ref().map(Self::map_row) {
            Some(event) => Ok(Some(self.attach_responses(event).await?)),
            None => Ok(None),
        }
    }

    /// Find event by public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> EventResult<Option<Event>> {
        let row = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE public_id = ?"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        match row.as_ref().map(Self::map_row) {
            Some(event) => Ok(Some(self.attach_responses(event).await?)),
            None => Ok(None),
        }
    }

    /// List every event, date ascending.
    pub async fn list_all(&self) -> EventResult<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY event_date ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        let mut events = Vec::with_capacity(rows.len());
        for event in rows.iter().map(Self::map_row) {
            events.push(self.attach_responses(event).await?);
        }
        Ok(events)
    }

    /// List events on or after `today` (ISO `YYYY-MM-DD`), date ascending,
    /// bounded to `limit`.
    pub async fn list_upcoming(&self, today: &str, limit: i64) -> EventResult<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_date >= ?
             ORDER BY event_date ASC, id ASC LIMIT ?"
        ))
        .bind(today)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        let mut events = Vec::with_capacity(rows.len());
        for event in rows.iter().map(Self::map_row) {
            events.push(self.attach_responses(event).await?);
        }
        Ok(events)
    }

    /// Apply a partial event update. Only supplied fields are written.
    pub async fn update(&self, event_id: i64, request: &UpdateEventRequest) -> EventResult<Event> {
        let mut query_parts = Vec::new();
        let mut values: Vec<String> = Vec::new();
        let mut capacity: Option<i64> = None;

        if let Some(ref title) = request.title {
            query_parts.push("title = ?");
            values.push(title.clone());
        }

        if let Some(ref description) = request.description {
            query_parts.push("description = ?");
            values.push(description.clone());
        }

        if let Some(ref date) = request.date {
            query_parts.push("event_date = ?");
            values.push(date.clone());
        }

        if let Some(ref time) = request.time {
            query_parts.push("event_time = ?");
            values.push(time.clone());
        }

        if let Some(ref location) = request.location {
            query_parts.push("location = ?");
            values.push(location.clone());
        }

        if let Some(max) = request.capacity {
            query_parts.push("capacity = ?");
            capacity = Some(max);
        }

        if query_parts.is_empty() {
            return self.find_by_id(event_id).await?.ok_or(EventError::EventNotFound);
        }

        let set_clause = query_parts.join(", ");
        let query_str = format!("UPDATE events SET {} WHERE id = ?", set_clause);

        let mut query = sqlx::query(&query_str);
        for value in values {
            query = query.bind(value);
        }
        if let Some(max) = capacity {
            query = query.bind(max);
        }
        query = query.bind(event_id);

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(EventError::EventNotFound);
        }

        self.find_by_id(event_id).await?.ok_or(EventError::EventNotFound)
    }

    /// Delete an event and its response rows.
    pub async fn delete(&self, event_id: i64) -> EventResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM event_responses WHERE event_id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(EventError::EventNotFound);
        }

        tx.commit()
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        info!(event_id, "deleted event");
        Ok(())
    }

    /// Record an attending response.
    ///
    /// The capacity check and the status upsert run inside one transaction:
    /// when the event has a capacity and the attending set is full, a new
    /// attendee is rejected with [`EventError::CapacityExceeded`]. An account
    /// that is already attending passes through unchanged (idempotent), and
    /// a declined account flips to attending. The single status row per
    /// (event, account) keeps the two sets disjoint.
    pub async fn attend(&self, event_id: i64, account_id: i64) -> EventResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        let capacity: Option<i64> =
            sqlx::query_scalar("SELECT capacity FROM events WHERE id = ?")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| EventError::DatabaseError(e.to_string()))?
                .ok_or(EventError::EventNotFound)?;

        if let Some(max) = capacity {
            let current_status: Option<String> = sqlx::query_scalar(
                "SELECT status FROM event_responses WHERE event_id = ? AND account_id = ?",
            )
            .bind(event_id)
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

            let already_attending =
                current_status.as_deref() == Some(AttendanceStatus::Attending.as_str());

            if !already_attending {
                let attending: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM event_responses WHERE event_id = ? AND status = ?",
                )
                .bind(event_id)
                .bind(AttendanceStatus::Attending.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| EventError::DatabaseError(e.to_string()))?;

                if attending >= max {
                    return Err(EventError::CapacityExceeded);
                }
            }
        }

        self.upsert_response(&mut tx, event_id, account_id, AttendanceStatus::Attending)
            .await?;

        tx.commit()
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Record a declined response. Never capacity-limited, idempotent; an
    /// attending account flips to declined.
    pub async fn decline(&self, event_id: i64, account_id: i64) -> EventResult<()> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;
        if exists == 0 {
            return Err(EventError::EventNotFound);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        self.upsert_response(&mut tx, event_id, account_id, AttendanceStatus::Declined)
            .await?;

        tx.commit()
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn upsert_response(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        event_id: i64,
        account_id: i64,
        status: AttendanceStatus,
    ) -> EventResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO event_responses (event_id, account_id, status, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(event_id, account_id)
             DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at",
        )
        .bind(event_id)
        .bind(account_id)
        .bind(status.as_str())
        .bind(&now)
        .execute(&mut **tx)
        .await
        .map_err(|e| EventError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
