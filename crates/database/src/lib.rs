//! Clubhouse Database Crate
//!
//! This crate provides database functionality for the Clubhouse backend,
//! including connection management, migrations, and repository implementations
//! for accounts, groups, messages, events, notifications, and documents.

use sqlx::SqlitePool;
use clubhouse_config::DatabaseConfig;

pub mod connection;
pub mod migrations;
pub mod repos;
pub mod entities;
pub mod types;

pub use connection::{DatabaseConnection, prepare_database};
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{
    AccountRepository, GroupRepository, MessageRepository, EventRepository,
    NotificationRepository, DocumentRepository,
};

// Re-export entities
pub use entities::{
    account::{Account, Role, CreateAccountRecord, UpdateProfileRequest},
    group::{Group, GroupMember, CreateGroupRequest, UpdateGroupRequest},
    message::Message,
    event::{Event, AttendanceStatus, CreateEventRecord, UpdateEventRequest},
    notification::{Notification, NotificationKind, CreateNotificationRequest},
    document::{Document, DocumentSummary, CreateDocumentRecord},
};

// Re-export types
pub use types::{
    errors::{
        DatabaseError, AccountError, AuthError, GroupError, EventError,
        NotificationError, DocumentError,
    },
    DatabaseResult, AccountResult, AuthResult, GroupResult, EventResult,
    NotificationResult, DocumentResult,
};

/// Re-export commonly used types for convenience
pub use sqlx::Pool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_database() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite:{}", db_path.display());

        let config = DatabaseConfig {
            url: db_url,
            max_connections: 1,
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }

    #[tokio::test]
    async fn test_database_initialization() {
        let (_pool, _temp_dir) = create_test_database().await;
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let (pool, _temp_dir) = create_test_database().await;

        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(result.0, true);
    }

    #[tokio::test]
    async fn test_migrated_schema_has_core_tables() {
        let (pool, _temp_dir) = create_test_database().await;

        for table in [
            "accounts",
            "groups",
            "group_members",
            "messages",
            "events",
            "event_responses",
            "notifications",
            "documents",
        ] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }
}
