//! Account repository for database operations.

use crate::entities::{Account, CreateAccountRecord, Role, UpdateProfileRequest};
use crate::types::{AccountResult, AccountError};
use sqlx::{SqlitePool, Row};
use chrono::Utc;

const ACCOUNT_COLUMNS: &str =
    "id, public_id, email, display_name, role, phone, position, avatar, created_at, updated_at";

/// Repository for account database operations
#[derive(Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_account(row: &sqlx::sqlite::SqliteRow) -> Account {
        Account {
            id: row.get("id"),
            public_id: row.get("public_id"),
            email: row.get("email"),
            display_name: row.get("display_name"),
            role: Role::from(row.get::<String, _>("role").as_str()),
            phone: row.get("phone"),
            position: row.get("position"),
            avatar: row.get("avatar"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    /// Find account by internal ID
    pub async fn find_by_id(&self, id: i64) -> AccountResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(row.map(|row| Self::map_account(&row)))
    }

    /// Find account by public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> AccountResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE public_id = ?"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(row.map(|row| Self::map_account(&row)))
    }

    /// Find account by email
    pub async fn find_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(row.map(|row| Self::map_account(&row)))
    }

    /// Find account and its stored password hash by email, for login.
    pub async fn find_credentials(&self, email: &str) -> AccountResult<Option<(Account, String)>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS}, password_hash FROM accounts WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(row.map(|row| {
            let hash: String = row.get("password_hash");
            (Self::map_account(&row), hash)
        }))
    }

    /// Create a new account. Duplicate emails are reported as a conflict and
    /// leave the table untouched.
    pub async fn create(&self, record: &CreateAccountRecord) -> AccountResult<Account> {
        let now = Utc::now().to_rfc3339();
        let public_id = cuid2::cuid();

        let result = sqlx::query(
            "INSERT INTO accounts (public_id, email, password_hash, display_name, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.display_name)
        .bind(record.role.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                AccountError::EmailAlreadyExists
            } else {
                AccountError::DatabaseError(e.to_string())
            }
        })?;

        let account_id = result.last_insert_rowid();

        self.find_by_id(account_id).await?.ok_or_else(|| {
            AccountError::DatabaseError("Failed to retrieve created account".to_string())
        })
    }

    /// Check if email exists
    pub async fn email_exists(&self, email: &str) -> AccountResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }

    /// Apply a partial profile update. Only supplied fields are written; an
    /// empty request leaves the row untouched and returns the current state.
    pub async fn update_profile(
        &self,
        account_id: i64,
        request: &UpdateProfileRequest,
    ) -> AccountResult<Account> {
        let now = Utc::now().to_rfc3339();

        let mut query_parts = Vec::new();
        let mut values = Vec::new();

        if let Some(ref display_name) = request.display_name {
            query_parts.push("display_name = ?");
            values.push(display_name.clone());
        }

        if let Some(ref phone) = request.phone {
            query_parts.push("phone = ?");
            values.push(phone.clone());
        }

        if let Some(ref position) = request.position {
            query_parts.push("position = ?");
            values.push(position.clone());
        }

        if let Some(ref avatar) = request.avatar {
            query_parts.push("avatar = ?");
            values.push(avatar.clone());
        }

        if query_parts.is_empty() {
            return self
                .find_by_id(account_id)
                .await?
                .ok_or(AccountError::AccountNotFound);
        }

        query_parts.push("updated_at = ?");
        values.push(now);

        let set_clause = query_parts.join(", ");
        let query_str = format!("UPDATE accounts SET {} WHERE id = ?", set_clause);

        let mut query = sqlx::query(&query_str);
        for value in values {
            query = query.bind(value);
        }
        query = query.bind(account_id);

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::AccountNotFound);
        }

        self.find_by_id(account_id)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }

    /// Change an account's role.
    pub async fn update_role(&self, account_id: i64, role: Role) -> AccountResult<Account> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query("UPDATE accounts SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role.to_string())
            .bind(&now)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::AccountNotFound);
        }

        self.find_by_id(account_id)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }

    /// List every account, oldest first.
    pub async fn list_all(&self) -> AccountResult<Vec<Account>> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(rows.iter().map(Self::map_account).collect())
    }

    /// Get account count
    pub async fn count(&self) -> AccountResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::test_support::create_test_pool;

    fn test_record(email: &str) -> CreateAccountRecord {
        CreateAccountRecord {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            display_name: "Test Account".to_string(),
            role: Role::Member,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = create_test_pool().await;
        let repo = AccountRepository::new(pool);

        let created = repo.create(&test_record("a@example.com")).await.unwrap();
        assert_eq!(created.email, "a@example.com");
        assert_eq!(created.role, Role::Member);
        assert!(!created.public_id.is_empty());

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_public = repo
            .find_by_public_id(&created.public_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_public.id, created.id);

        let by_email = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict_without_insert() {
        let pool = create_test_pool().await;
        let repo = AccountRepository::new(pool);

        repo.create(&test_record("dup@example.com")).await.unwrap();
        let err = repo.create(&test_record("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AccountError::EmailAlreadyExists));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_credentials_stay_out_of_account_entity() {
        let pool = create_test_pool().await;
        let repo = AccountRepository::new(pool);

        repo.create(&test_record("c@example.com")).await.unwrap();

        let (account, hash) = repo
            .find_credentials("c@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hash, "hash");
        assert_eq!(account.email, "c@example.com");
    }

    #[tokio::test]
    async fn test_partial_profile_update() {
        let pool = create_test_pool().await;
        let repo = AccountRepository::new(pool);

        let account = repo.create(&test_record("p@example.com")).await.unwrap();

        let update = UpdateProfileRequest {
            phone: Some("12345".to_string()),
            ..Default::default()
        };
        let updated = repo.update_profile(account.id, &update).await.unwrap();

        assert_eq!(updated.phone.as_deref(), Some("12345"));
        // Omitted fields are untouched.
        assert_eq!(updated.display_name, account.display_name);

        // Blanking requires an explicit empty string.
        let blank = UpdateProfileRequest {
            phone: Some(String::new()),
            ..Default::default()
        };
        let blanked = repo.update_profile(account.id, &blank).await.unwrap();
        assert_eq!(blanked.phone.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_update_role() {
        let pool = create_test_pool().await;
        let repo = AccountRepository::new(pool);

        let account = repo.create(&test_record("r@example.com")).await.unwrap();
        let updated = repo.update_role(account.id, Role::Trainer).await.unwrap();
        assert_eq!(updated.role, Role::Trainer);

        let err = repo.update_role(9999, Role::Admin).await.unwrap_err();
        assert!(matches!(err, AccountError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let pool = create_test_pool().await;
        let repo = AccountRepository::new(pool);

        repo.create(&test_record("one@example.com")).await.unwrap();
        repo.create(&test_record("two@example.com")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
