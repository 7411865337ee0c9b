//! Group service: group lifecycle and membership management.

use sqlx::SqlitePool;
use tracing::{error, info};

use clubhouse_database::{
    Account, AccountRepository, CreateGroupRequest, Group, GroupError, GroupRepository,
    GroupResult, MessageRepository, NotificationKind, UpdateGroupRequest,
};
use clubhouse_policy::{decide, Action, Actor, Context};

use super::notification_service::NotificationService;

/// Service for group lifecycle and membership operations.
#[derive(Clone)]
pub struct GroupService {
    groups: GroupRepository,
    messages: MessageRepository,
    accounts: AccountRepository,
    notifications: NotificationService,
}

impl GroupService {
    /// Create a new group service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            groups: GroupRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
        }
    }

    fn actor(account: &Account) -> Actor {
        Actor::new(account.id, account.role)
    }

    /// Create a group. The creator is auto-inserted into the member set.
    pub async fn create(&self, actor: &Account, request: &CreateGroupRequest) -> GroupResult<Group> {
        decide(&Self::actor(actor), Action::CreateGroup, &Context::none())
            .map_err(|d| GroupError::Forbidden(d.to_string()))?;

        if request.name.trim().is_empty() {
            return Err(GroupError::Validation("group name must not be empty".to_string()));
        }

        self.groups.create(actor.id, request).await
    }

    /// List groups visible to the actor: every group for an admin, member
    /// groups for everyone else.
    pub async fn list(&self, actor: &Account) -> GroupResult<Vec<Group>> {
        if actor.role.is_admin() {
            self.groups.list_all().await
        } else {
            self.groups.list_for_member(actor.id).await
        }
    }

    /// Fetch one group by public id.
    pub async fn get(&self, public_id: &str) -> GroupResult<Group> {
        self.groups
            .find_by_public_id(public_id)
            .await?
            .ok_or(GroupError::GroupNotFound)
    }

    /// Apply a partial group update. Requires an elevated role.
    pub async fn update(
        &self,
        actor: &Account,
        public_id: &str,
        request: &UpdateGroupRequest,
    ) -> GroupResult<Group> {
        let group = self.get(public_id).await?;

        decide(&Self::actor(actor), Action::UpdateGroup, &Context::none())
            .map_err(|d| GroupError::Forbidden(d.to_string()))?;

        self.groups.update(group.id, request).await
    }

    /// Delete a group and purge its messages. Admin-only.
    ///
    /// The cascade is a two-phase best-effort sequence, not a transaction:
    /// the group row (and membership) goes first, then the message purge.
    /// If the purge fails the group is already gone; the failure is logged
    /// for operator remediation and not surfaced to the caller.
    pub async fn delete(&self, actor: &Account, public_id: &str) -> GroupResult<()> {
        let group = self.get(public_id).await?;

        decide(&Self::actor(actor), Action::DeleteGroup, &Context::none())
            .map_err(|d| GroupError::Forbidden(d.to_string()))?;

        self.groups.delete(group.id).await?;

        if let Err(e) = self.messages.delete_by_group(group.id).await {
            error!(
                group_id = group.id,
                group = %group.public_id,
                error = %e,
                "group deleted but message purge failed; orphaned messages need operator cleanup"
            );
        }

        Ok(())
    }

    /// Add an account to a group's member set and notify it.
    ///
    /// The set insert is idempotent; re-adding an existing member is a
    /// no-op, not an error.
    pub async fn add_member(
        &self,
        actor: &Account,
        group_public_id: &str,
        account_public_id: &str,
    ) -> GroupResult<Group> {
        let group = self.get(group_public_id).await?;

        decide(&Self::actor(actor), Action::AddGroupMember, &Context::none())
            .map_err(|d| GroupError::Forbidden(d.to_string()))?;

        let account = self
            .accounts
            .find_by_public_id(account_public_id)
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?
            .ok_or(GroupError::AccountNotFound)?;

        self.groups.add_member(group.id, account.id).await?;

        self.notifications
            .fan_out(
                &[account.id],
                NotificationKind::GroupAdded,
                &format!("You have been added to the group {}", group.name),
                Some(("group", &group.public_id)),
            )
            .await;

        info!(
            group = %group.public_id,
            account = %account.public_id,
            added_by = %actor.public_id,
            "added group member"
        );

        self.get(group_public_id).await
    }

    /// Remove an account from a group's member set. Idempotent.
    pub async fn remove_member(
        &self,
        actor: &Account,
        group_public_id: &str,
        account_public_id: &str,
    ) -> GroupResult<Group> {
        let group = self.get(group_public_id).await?;

        decide(&Self::actor(actor), Action::RemoveGroupMember, &Context::none())
            .map_err(|d| GroupError::Forbidden(d.to_string()))?;

        let account = self
            .accounts
            .find_by_public_id(account_public_id)
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?
            .ok_or(GroupError::AccountNotFound)?;

        self.groups.remove_member(group.id, account.id).await?;

        self.get(group_public_id).await
    }
}
