//! Repository implementations for database operations.

pub mod account_repository;
pub mod group_repository;
pub mod message_repository;
pub mod event_repository;
pub mod notification_repository;
pub mod document_repository;

pub use account_repository::AccountRepository;
pub use group_repository::GroupRepository;
pub use message_repository::MessageRepository;
pub use event_repository::EventRepository;
pub use notification_repository::NotificationRepository;
pub use document_repository::DocumentRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    /// Create an in-memory pool with the full schema, for repository tests.
    /// Pinned to a single connection: every pooled connection would otherwise
    /// open its own empty `:memory:` database.
    pub async fn create_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .unwrap();
        crate::migrations::run_migrations(&pool).await.unwrap();
        pool
    }

    /// Insert a bare account row and return its internal id.
    pub async fn insert_account(pool: &SqlitePool, email: &str, name: &str, role: &str) -> i64 {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO accounts (public_id, email, password_hash, display_name, role, created_at, updated_at)
             VALUES (?, ?, 'x', ?, ?, ?, ?)",
        )
        .bind(cuid2::cuid())
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .unwrap();
        result.last_insert_rowid()
    }
}
