//! Group repository: group records and their membership sets.

use crate::entities::{Group, GroupMember, CreateGroupRequest, UpdateGroupRequest};
use crate::types::{GroupResult, GroupError};
use sqlx::{SqlitePool, Row};
use tracing::info;

/// Repository for group and membership database operations
#[derive(Clone)]
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    /// Create a new group repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_members(&self, group_id: i64) -> GroupResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT a.public_id FROM group_members gm
             JOIN accounts a ON a.id = gm.account_id
             WHERE gm.group_id = ? ORDER BY gm.added_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        Ok(rows.iter().map(|row| row.get("public_id")).collect())
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> Group {
        Group {
            id: row.get("id"),
            public_id: row.get("public_id"),
            name: row.get("name"),
            description: row.get("description"),
            group_type: row.get("group_type"),
            created_by: row.get("created_by"),
            members: Vec::new(),
            created_at: row.get("created_at"),
        }
    }

    async fn attach_members(&self, mut group: Group) -> GroupResult<Group> {
        group.members = self.load_members(group.id).await?;
        Ok(group)
    }

    /// Create a group; the creator is inserted into the member set in the
    /// same transaction.
    pub async fn create(&self, created_by: i64, request: &CreateGroupRequest) -> GroupResult<Group> {
        let now = chrono::Utc::now().to_rfc3339();
        let public_id = cuid2::cuid();
        let group_type = request.group_type.as_deref().unwrap_or("general");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO groups (public_id, name, description, group_type, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(group_type)
        .bind(created_by)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        let group_id = result.last_insert_rowid();

        sqlx::query(
            "INSERT INTO group_members (group_id, account_id, added_at) VALUES (?, ?, ?)",
        )
        .bind(group_id)
        .bind(created_by)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        info!(group_id, public_id = %public_id, created_by, "created new group");

        self.find_by_id(group_id).await?.ok_or_else(|| {
            GroupError::DatabaseError("Failed to retrieve created group".to_string())
        })
    }

    /// Find group by internal ID
    pub async fn find_by_id(&self, id: i64) -> GroupResult<Option<Group>> {
        let row = sqlx::query(
            "SELECT id, public_id, name, description, group_type, created_by, created_at
             FROM groups WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        match row.as_ref().map(Self::map_row) {
            Some(group) => Ok(Some(self.attach_members(group).await?)),
            None => Ok(None),
        }
    }

    /// Find group by public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> GroupResult<Option<Group>> {
        let row = sqlx::query(
            "SELECT id, public_id, name, description, group_type, created_by, created_at
             FROM groups WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        match row.as_ref().map(Self::map_row) {
            Some(group) => Ok(Some(self.attach_members(group).await?)),
            None => Ok(None),
        }
    }

    /// List every group, oldest first.
    pub async fn list_all(&self) -> GroupResult<Vec<Group>> {
        let rows = sqlx::query(
            "SELECT id, public_id, name, description, group_type, created_by, created_at
             FROM groups ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        let mut groups = Vec::with_capacity(rows.len());
        for group in rows.iter().map(Self::map_row) {
            groups.push(self.attach_members(group).await?);
        }
        Ok(groups)
    }

    /// List groups containing the given account in their member set.
    pub async fn list_for_member(&self, account_id: i64) -> GroupResult<Vec<Group>> {
        let rows = sqlx::query(
            "SELECT g.id, g.public_id, g.name, g.description, g.group_type, g.created_by, g.created_at
             FROM groups g
             JOIN group_members gm ON gm.group_id = g.id
             WHERE gm.account_id = ?
             ORDER BY g.created_at ASC, g.id ASC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        let mut groups = Vec::with_capacity(rows.len());
        for group in rows.iter().map(Self::map_row) {
            groups.push(self.attach_members(group).await?);
        }
        Ok(groups)
    }

    /// Apply a partial group update. Only supplied fields are written.
    pub async fn update(&self, group_id: i64, request: &UpdateGroupRequest) -> GroupResult<Group> {
        let mut query_parts = Vec::new();
        let mut values = Vec::new();

        if let Some(ref name) = request.name {
            query_parts.push("name = ?");
            values.push(name.clone());
        }

        if let Some(ref description) = request.description {
            query_parts.push("description = ?");
            values.push(description.clone());
        }

        if query_parts.is_empty() {
            return self.find_by_id(group_id).await?.ok_or(GroupError::GroupNotFound);
        }

        let set_clause = query_parts.join(", ");
        let query_str = format!("UPDATE groups SET {} WHERE id = ?", set_clause);

        let mut query = sqlx::query(&query_str);
        for value in values {
            query = query.bind(value);
        }
        query = query.bind(group_id);

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(GroupError::GroupNotFound);
        }

        self.find_by_id(group_id).await?.ok_or(GroupError::GroupNotFound)
    }

    /// Delete a group and its membership rows. Message purging is the
    /// caller's second phase.
    pub async fn delete(&self, group_id: i64) -> GroupResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM group_members WHERE group_id = ?")
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(group_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(GroupError::GroupNotFound);
        }

        tx.commit()
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        info!(group_id, "deleted group");
        Ok(())
    }

    /// Add an account to the member set. Atomic add-to-set: adding an
    /// existing member is a no-op, not an error. Returns whether a new row
    /// was inserted.
    pub async fn add_member(&self, group_id: i64, account_id: i64) -> GroupResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT OR IGNORE INTO group_members (group_id, account_id, added_at) VALUES (?, ?, ?)",
        )
        .bind(group_id)
        .bind(account_id)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove an account from the member set. Atomic remove-from-set,
    /// idempotent.
    pub async fn remove_member(&self, group_id: i64, account_id: i64) -> GroupResult<()> {
        sqlx::query("DELETE FROM group_members WHERE group_id = ? AND account_id = ?")
            .bind(group_id)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// List the member rows of a group with internal and public account ids.
    pub async fn members(&self, group_id: i64) -> GroupResult<Vec<GroupMember>> {
        let rows = sqlx::query(
            "SELECT gm.account_id, a.public_id, gm.added_at
             FROM group_members gm
             JOIN accounts a ON a.id = gm.account_id
             WHERE gm.group_id = ? ORDER BY gm.added_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| GroupMember {
                account_id: row.get("account_id"),
                account_public_id: row.get("public_id"),
                added_at: row.get("added_at"),
            })
            .collect())
    }

    /// Check whether an account is in a group's member set.
    pub async fn is_member(&self, group_id: i64, account_id: i64) -> GroupResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM group_members WHERE group_id = ? AND account_id = ?",
        )
        .bind(group_id)
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GroupError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::test_support::{create_test_pool, insert_account};

    fn test_request(name: &str) -> CreateGroupRequest {
        CreateGroupRequest {
            name: name.to_string(),
            description: Some("a test group".to_string()),
            group_type: None,
        }
    }

    #[tokio::test]
    async fn test_creator_becomes_member() {
        let pool = create_test_pool().await;
        let creator = insert_account(&pool, "creator@example.com", "Creator", "trainer").await;
        let repo = GroupRepository::new(pool);

        let group = repo.create(creator, &test_request("Board")).await.unwrap();

        assert_eq!(group.name, "Board");
        assert_eq!(group.group_type, "general");
        assert_eq!(group.members.len(), 1);
        assert!(repo.is_member(group.id, creator).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_member_is_idempotent() {
        let pool = create_test_pool().await;
        let creator = insert_account(&pool, "creator@example.com", "Creator", "trainer").await;
        let other = insert_account(&pool, "other@example.com", "Other", "member").await;
        let repo = GroupRepository::new(pool);

        let group = repo.create(creator, &test_request("Team")).await.unwrap();

        assert!(repo.add_member(group.id, other).await.unwrap());
        // Second add is a no-op, not an error.
        assert!(!repo.add_member(group.id, other).await.unwrap());

        let members = repo.members(group.id).await.unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_member_is_idempotent() {
        let pool = create_test_pool().await;
        let creator = insert_account(&pool, "creator@example.com", "Creator", "trainer").await;
        let other = insert_account(&pool, "other@example.com", "Other", "member").await;
        let repo = GroupRepository::new(pool);

        let group = repo.create(creator, &test_request("Team")).await.unwrap();
        repo.add_member(group.id, other).await.unwrap();

        repo.remove_member(group.id, other).await.unwrap();
        repo.remove_member(group.id, other).await.unwrap();

        assert!(!repo.is_member(group.id, other).await.unwrap());
        assert_eq!(repo.members(group.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_for_member_scopes_visibility() {
        let pool = create_test_pool().await;
        let creator = insert_account(&pool, "creator@example.com", "Creator", "trainer").await;
        let outsider = insert_account(&pool, "out@example.com", "Out", "member").await;
        let repo = GroupRepository::new(pool);

        repo.create(creator, &test_request("One")).await.unwrap();
        repo.create(creator, &test_request("Two")).await.unwrap();

        assert_eq!(repo.list_all().await.unwrap().len(), 2);
        assert_eq!(repo.list_for_member(creator).await.unwrap().len(), 2);
        assert_eq!(repo.list_for_member(outsider).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = create_test_pool().await;
        let creator = insert_account(&pool, "creator@example.com", "Creator", "trainer").await;
        let repo = GroupRepository::new(pool);

        let group = repo.create(creator, &test_request("Old Name")).await.unwrap();

        let update = UpdateGroupRequest {
            name: Some("New Name".to_string()),
            description: None,
        };
        let updated = repo.update(group.id, &update).await.unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.description, group.description);
    }

    #[tokio::test]
    async fn test_delete_removes_group_and_membership() {
        let pool = create_test_pool().await;
        let creator = insert_account(&pool, "creator@example.com", "Creator", "trainer").await;
        let repo = GroupRepository::new(pool.clone());

        let group = repo.create(creator, &test_request("Doomed")).await.unwrap();
        repo.delete(group.id).await.unwrap();

        assert!(repo.find_by_id(group.id).await.unwrap().is_none());
        let member_rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM group_members WHERE group_id = ?")
                .bind(group.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(member_rows, 0);

        let err = repo.delete(group.id).await.unwrap_err();
        assert!(matches!(err, GroupError::GroupNotFound));
    }
}
