//! Dashboard composition: one read-only view over the other services.

use std::sync::Arc;

use anyhow::Context as _;
use serde::Serialize;
use sqlx::SqlitePool;

use clubhouse_database::{
    Account, AccountRepository, DocumentRepository, DocumentSummary, Event, EventRepository,
    Group, GroupRepository, Notification, NotificationRepository,
};

use crate::clock::{Clock, SystemClock};

const UPCOMING_EVENTS: i64 = 5;
const RECENT_NOTIFICATIONS: i64 = 5;
const RECENT_DOCUMENTS: i64 = 5;

/// Aggregated per-actor dashboard data.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub upcoming_events: Vec<Event>,
    pub unread_notifications: i64,
    pub recent_notifications: Vec<Notification>,
    pub groups: Vec<Group>,
    pub member_count: i64,
    pub recent_documents: Vec<DocumentSummary>,
}

/// Read-only composition of the other components for a single actor.
/// No new rules live here; it only stitches existing queries together.
#[derive(Clone)]
pub struct DashboardService {
    events: EventRepository,
    notifications: NotificationRepository,
    groups: GroupRepository,
    accounts: AccountRepository,
    documents: DocumentRepository,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    /// Create a new dashboard service instance with the system clock.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Create a dashboard service with an injected clock.
    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool.clone()),
            documents: DocumentRepository::new(pool),
            clock,
        }
    }

    /// Compose the dashboard for one actor.
    pub async fn overview(&self, actor: &Account) -> anyhow::Result<Dashboard> {
        let today = self.clock.today().format("%Y-%m-%d").to_string();

        let upcoming_events = self
            .events
            .list_upcoming(&today, UPCOMING_EVENTS)
            .await
            .context("failed to load upcoming events")?;

        let unread_notifications = self
            .notifications
            .unread_count(actor.id)
            .await
            .context("failed to count unread notifications")?;

        let recent_notifications = self
            .notifications
            .list_for_recipient_limited(actor.id, RECENT_NOTIFICATIONS)
            .await
            .context("failed to load recent notifications")?;

        let groups = if actor.role.is_admin() {
            self.groups.list_all().await
        } else {
            self.groups.list_for_member(actor.id).await
        }
        .context("failed to load groups")?;

        let member_count = self
            .accounts
            .count()
            .await
            .context("failed to count accounts")?;

        let recent_documents = self
            .documents
            .list_recent(RECENT_DOCUMENTS)
            .await
            .context("failed to load recent documents")?;

        Ok(Dashboard {
            upcoming_events,
            unread_notifications,
            recent_notifications,
            groups,
            member_count,
            recent_documents,
        })
    }
}
