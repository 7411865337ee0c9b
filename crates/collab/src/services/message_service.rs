//! Message service: the group messaging log and its fan-out.

use sqlx::SqlitePool;

use clubhouse_database::{
    Account, GroupError, GroupRepository, GroupResult, Message, MessageRepository,
    NotificationKind,
};
use clubhouse_policy::{decide, Action, Actor, Context};

use super::notification_service::NotificationService;

/// Default number of messages returned by a listing.
pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Service for group messaging.
#[derive(Clone)]
pub struct MessageService {
    groups: GroupRepository,
    messages: MessageRepository,
    notifications: NotificationService,
}

impl MessageService {
    /// Create a new message service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            groups: GroupRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
        }
    }

    /// Send a message to a group.
    ///
    /// Requires membership or the admin role. The sender's display name is
    /// captured into the message as a snapshot. After the write commits,
    /// every other member gets one `new_message` notification; fan-out
    /// failures never affect the send result.
    pub async fn send(
        &self,
        actor: &Account,
        group_public_id: &str,
        content: &str,
    ) -> GroupResult<Message> {
        if content.trim().is_empty() {
            return Err(GroupError::Validation("message content must not be empty".to_string()));
        }

        let group = self
            .groups
            .find_by_public_id(group_public_id)
            .await?
            .ok_or(GroupError::GroupNotFound)?;

        let is_member = self.groups.is_member(group.id, actor.id).await?;

        decide(
            &Actor::new(actor.id, actor.role),
            Action::SendGroupMessage,
            &Context::with_membership(is_member),
        )
        .map_err(|d| GroupError::Forbidden(d.to_string()))?;

        let message = self
            .messages
            .create(group.id, actor.id, &actor.display_name, content)
            .await?;

        let recipients: Vec<i64> = self
            .groups
            .members(group.id)
            .await?
            .into_iter()
            .map(|member| member.account_id)
            .filter(|&account_id| account_id != actor.id)
            .collect();

        self.notifications
            .fan_out(
                &recipients,
                NotificationKind::NewMessage,
                &format!("New message from {} in {}", actor.display_name, group.name),
                Some(("group", &group.public_id)),
            )
            .await;

        Ok(message)
    }

    /// List a group's messages in chronological order, bounded to the
    /// `limit` most recent ones.
    pub async fn list(
        &self,
        group_public_id: &str,
        limit: Option<i64>,
    ) -> GroupResult<Vec<Message>> {
        let limit = limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);
        if limit < 1 {
            return Err(GroupError::Validation("limit must be at least 1".to_string()));
        }

        let group = self
            .groups
            .find_by_public_id(group_public_id)
            .await?
            .ok_or(GroupError::GroupNotFound)?;

        // Newest `limit` first, then reversed to oldest-first.
        let mut messages = self.messages.list_recent(group.id, limit).await?;
        messages.reverse();
        Ok(messages)
    }
}
