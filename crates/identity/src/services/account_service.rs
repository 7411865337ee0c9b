//! Account service: listing, profile updates, and role changes.

use sqlx::SqlitePool;
use tracing::info;

use clubhouse_database::{
    Account, AccountError, AccountRepository, AccountResult, Role, UpdateProfileRequest,
};
use clubhouse_policy::{decide, Action, Actor, Context};

/// Service for account directory and administration operations.
#[derive(Clone)]
pub struct AccountService {
    accounts: AccountRepository,
}

impl AccountService {
    /// Create a new account service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// List every account.
    pub async fn list(&self) -> AccountResult<Vec<Account>> {
        self.accounts.list_all().await
    }

    /// Fetch one account by public id.
    pub async fn get(&self, public_id: &str) -> AccountResult<Account> {
        self.accounts
            .find_by_public_id(public_id)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }

    /// Total number of accounts.
    pub async fn count(&self) -> AccountResult<i64> {
        self.accounts.count().await
    }

    /// Update a profile. Allowed for the account itself or an admin; an
    /// empty payload is rejected before touching storage.
    pub async fn update_profile(
        &self,
        actor: &Account,
        target_public_id: &str,
        request: &UpdateProfileRequest,
    ) -> AccountResult<Account> {
        let target = self.get(target_public_id).await?;

        decide(
            &Actor::new(actor.id, actor.role),
            Action::UpdateProfile,
            &Context::for_account(target.id),
        )
        .map_err(|d| AccountError::Forbidden(d.to_string()))?;

        if request.is_empty() {
            return Err(AccountError::EmptyUpdate);
        }

        self.accounts.update_profile(target.id, request).await
    }

    /// Change an account's role. Admin-only; unknown role names are
    /// rejected.
    pub async fn change_role(
        &self,
        actor: &Account,
        target_public_id: &str,
        role: &str,
    ) -> AccountResult<Account> {
        decide(
            &Actor::new(actor.id, actor.role),
            Action::ChangeRole,
            &Context::none(),
        )
        .map_err(|d| AccountError::Forbidden(d.to_string()))?;

        let role = Role::parse(role).ok_or_else(|| AccountError::InvalidRole(role.to_string()))?;

        let target = self.get(target_public_id).await?;
        let updated = self.accounts.update_role(target.id, role).await?;

        info!(
            target = %updated.public_id,
            role = role.as_str(),
            changed_by = %actor.public_id,
            "changed account role"
        );

        Ok(updated)
    }
}
