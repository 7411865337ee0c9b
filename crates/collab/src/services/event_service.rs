//! Event service: event lifecycle and the attend/decline state machine.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use clubhouse_database::{
    Account, AccountRepository, CreateEventRecord, Event, EventError, EventRepository,
    EventResult, GroupRepository, NotificationKind, UpdateEventRequest,
};
use clubhouse_policy::{decide, Action, Actor, Context};

use super::notification_service::NotificationService;
use crate::clock::{Clock, SystemClock};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default number of events returned by the upcoming listing.
pub const DEFAULT_UPCOMING_LIMIT: i64 = 5;

/// Event creation payload. The optional group scope is a public group id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub group_id: Option<String>,
    pub capacity: Option<i64>,
}

/// Service for event lifecycle and attendance.
#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    groups: GroupRepository,
    accounts: AccountRepository,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
}

impl EventService {
    /// Create a new event service instance with the system clock.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Create an event service with an injected clock.
    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
            clock,
        }
    }

    fn actor(account: &Account) -> Actor {
        Actor::new(account.id, account.role)
    }

    fn validate_date(date: &str) -> EventResult<()> {
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map(|_| ())
            .map_err(|_| EventError::Validation("date must be formatted YYYY-MM-DD".to_string()))
    }

    /// Create an event and broadcast a `new_event` notification to every
    /// account except the creator.
    ///
    /// The broadcast deliberately ignores the optional group scope; see
    /// DESIGN.md for the recorded inconsistency.
    pub async fn create(&self, actor: &Account, request: &CreateEventRequest) -> EventResult<Event> {
        decide(&Self::actor(actor), Action::CreateEvent, &Context::none())
            .map_err(|d| EventError::Forbidden(d.to_string()))?;

        if request.title.trim().is_empty() {
            return Err(EventError::Validation("event title must not be empty".to_string()));
        }
        Self::validate_date(&request.date)?;
        if let Some(capacity) = request.capacity {
            if capacity < 1 {
                return Err(EventError::Validation("capacity must be at least 1".to_string()));
            }
        }

        let group_id = match request.group_id.as_deref() {
            None => None,
            Some(public_id) => Some(
                self.groups
                    .find_by_public_id(public_id)
                    .await
                    .map_err(|e| EventError::DatabaseError(e.to_string()))?
                    .ok_or_else(|| {
                        EventError::Validation(format!("unknown group scope: {public_id}"))
                    })?
                    .id,
            ),
        };

        let record = CreateEventRecord {
            title: request.title.clone(),
            description: request.description.clone(),
            date: request.date.clone(),
            time: request.time.clone(),
            location: request.location.clone(),
            group_id,
            capacity: request.capacity,
        };

        let event = self.events.create(actor.id, &record).await?;

        let recipients: Vec<i64> = self
            .accounts
            .list_all()
            .await
            .map_err(|e| EventError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(|account| account.id)
            .filter(|&account_id| account_id != actor.id)
            .collect();

        self.notifications
            .fan_out(
                &recipients,
                NotificationKind::NewEvent,
                &format!("New event: {}", event.title),
                Some(("event", &event.public_id)),
            )
            .await;

        Ok(event)
    }

    /// List every event, date ascending.
    pub async fn list(&self) -> EventResult<Vec<Event>> {
        self.events.list_all().await
    }

    /// List events from today onward per the injected clock, date
    /// ascending, bounded to `limit`.
    pub async fn upcoming(&self, limit: Option<i64>) -> EventResult<Vec<Event>> {
        let limit = limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
        if limit < 1 {
            return Err(EventError::Validation("limit must be at least 1".to_string()));
        }

        let today = self.clock.today().format(DATE_FORMAT).to_string();
        self.events.list_upcoming(&today, limit).await
    }

    /// Fetch one event by public id.
    pub async fn get(&self, public_id: &str) -> EventResult<Event> {
        self.events
            .find_by_public_id(public_id)
            .await?
            .ok_or(EventError::EventNotFound)
    }

    /// Apply a partial event update. Requires an elevated role.
    pub async fn update(
        &self,
        actor: &Account,
        public_id: &str,
        request: &UpdateEventRequest,
    ) -> EventResult<Event> {
        let event = self.get(public_id).await?;

        decide(&Self::actor(actor), Action::UpdateEvent, &Context::none())
            .map_err(|d| EventError::Forbidden(d.to_string()))?;

        if let Some(ref date) = request.date {
            Self::validate_date(date)?;
        }

        self.events.update(event.id, request).await
    }

    /// Delete an event. Requires an elevated role.
    pub async fn delete(&self, actor: &Account, public_id: &str) -> EventResult<()> {
        let event = self.get(public_id).await?;

        decide(&Self::actor(actor), Action::DeleteEvent, &Context::none())
            .map_err(|d| EventError::Forbidden(d.to_string()))?;

        self.events.delete(event.id).await
    }

    /// Record the actor as attending. Enforces capacity; idempotent when
    /// already attending; clears any declined response.
    pub async fn attend(&self, actor: &Account, public_id: &str) -> EventResult<Event> {
        let event = self.get(public_id).await?;
        self.events.attend(event.id, actor.id).await?;
        self.get(public_id).await
    }

    /// Record the actor as declined. Never capacity-limited; idempotent;
    /// clears any attending response.
    pub async fn decline(&self, actor: &Account, public_id: &str) -> EventResult<Event> {
        let event = self.get(public_id).await?;
        self.events.decline(event.id, actor.id).await?;
        self.get(public_id).await
    }
}
