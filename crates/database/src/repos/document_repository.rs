//! Document repository for database operations.

use crate::entities::{Document, DocumentSummary, CreateDocumentRecord};
use crate::types::{DocumentResult, DocumentError};
use sqlx::{SqlitePool, Row};
use tracing::info;

const SUMMARY_COLUMNS: &str =
    "id, public_id, name, group_id, file_type, uploaded_by, uploader_name, created_at";

/// Repository for document metadata and content.
///
/// The content column is only selected in single-item fetches; list queries
/// always project the summary columns.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Create a new document repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_summary(row: &sqlx::sqlite::SqliteRow) -> DocumentSummary {
        DocumentSummary {
            id: row.get("id"),
            public_id: row.get("public_id"),
            name: row.get("name"),
            group_id: row.get("group_id"),
            file_type: row.get("file_type"),
            uploaded_by: row.get("uploaded_by"),
            uploader_name: row.get("uploader_name"),
            created_at: row.get("created_at"),
        }
    }

    /// Store a new document. `uploader_name` is a snapshot taken at upload
    /// time.
    pub async fn create(&self, record: &CreateDocumentRecord) -> DocumentResult<Document> {
        let now = chrono::Utc::now().to_rfc3339();
        let public_id = cuid2::cuid();

        let result = sqlx::query(
            "INSERT INTO documents (public_id, name, group_id, content, file_type, uploaded_by, uploader_name, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&record.name)
        .bind(record.group_id)
        .bind(&record.content)
        .bind(&record.file_type)
        .bind(record.uploaded_by)
        .bind(&record.uploader_name)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| DocumentError::DatabaseError(e.to_string()))?;

        let document_id = result.last_insert_rowid();

        info!(document_id, public_id = %public_id, "stored new document");

        Ok(Document {
            id: document_id,
            public_id,
            name: record.name.clone(),
            group_id: record.group_id,
            content: record.content.clone(),
            file_type: record.file_type.clone(),
            uploaded_by: record.uploaded_by,
            uploader_name: record.uploader_name.clone(),
            created_at: now,
        })
    }

    /// Fetch one document including its content.
    pub async fn find_by_public_id(&self, public_id: &str) -> DocumentResult<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, public_id, name, group_id, content, file_type, uploaded_by, uploader_name, created_at
             FROM documents WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DocumentError::DatabaseError(e.to_string()))?;

        Ok(row.map(|row| Document {
            id: row.get("id"),
            public_id: row.get("public_id"),
            name: row.get("name"),
            group_id: row.get("group_id"),
            content: row.get("content"),
            file_type: row.get("file_type"),
            uploaded_by: row.get("uploaded_by"),
            uploader_name: row.get("uploader_name"),
            created_at: row.get("created_at"),
        }))
    }

    /// List document summaries, newest first, optionally filtered to a group.
    pub async fn list(&self, group_id: Option<i64>) -> DocumentResult<Vec<DocumentSummary>> {
        let rows = match group_id {
            Some(group_id) => {
                sqlx::query(&format!(
                    "SELECT {SUMMARY_COLUMNS} FROM documents WHERE group_id = ?
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(group_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {SUMMARY_COLUMNS} FROM documents
                     ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DocumentError::DatabaseError(e.to_string()))?;

        Ok(rows.iter().map(Self::map_summary).collect())
    }

    /// List the newest document summaries.
    pub async fn list_recent(&self, limit: i64) -> DocumentResult<Vec<DocumentSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM documents
             ORDER BY created_at DESC, id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DocumentError::DatabaseError(e.to_string()))?;

        Ok(rows.iter().map(Self::map_summary).collect())
    }

    /// Delete a document by public ID.
    pub async fn delete(&self, public_id: &str) -> DocumentResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE public_id = ?")
            .bind(public_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DocumentError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DocumentError::DocumentNotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::test_support::{create_test_pool, insert_account};

    fn test_record(uploader: i64, name: &str) -> CreateDocumentRecord {
        CreateDocumentRecord {
            name: name.to_string(),
            group_id: None,
            content: "aGVsbG8gd29ybGQ=".to_string(),
            file_type: "pdf".to_string(),
            uploaded_by: uploader,
            uploader_name: "Uploader".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_with_content() {
        let pool = create_test_pool().await;
        let uploader = insert_account(&pool, "u@example.com", "Uploader", "trainer").await;
        let repo = DocumentRepository::new(pool);

        let created = repo.create(&test_record(uploader, "handbook")).await.unwrap();

        let fetched = repo
            .find_by_public_id(&created.public_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.content, "aGVsbG8gd29ybGQ=");
        assert_eq!(fetched.uploader_name, "Uploader");
    }

    #[tokio::test]
    async fn test_list_excludes_content_and_filters_by_group() {
        let pool = create_test_pool().await;
        let uploader = insert_account(&pool, "u@example.com", "Uploader", "trainer").await;
        let repo = DocumentRepository::new(pool.clone());

        let now = chrono::Utc::now().to_rfc3339();
        let group_id = sqlx::query(
            "INSERT INTO groups (public_id, name, group_type, created_by, created_at)
             VALUES (?, 'G', 'general', ?, ?)",
        )
        .bind(cuid2::cuid())
        .bind(uploader)
        .bind(&now)
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

        repo.create(&test_record(uploader, "global")).await.unwrap();
        let mut scoped = test_record(uploader, "scoped");
        scoped.group_id = Some(group_id);
        repo.create(&scoped).await.unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = repo.list(Some(group_id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "scoped");
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = create_test_pool().await;
        let uploader = insert_account(&pool, "u@example.com", "Uploader", "trainer").await;
        let repo = DocumentRepository::new(pool);

        let created = repo.create(&test_record(uploader, "doomed")).await.unwrap();
        repo.delete(&created.public_id).await.unwrap();

        assert!(repo
            .find_by_public_id(&created.public_id)
            .await
            .unwrap()
            .is_none());

        let err = repo.delete(&created.public_id).await.unwrap_err();
        assert!(matches!(err, DocumentError::DocumentNotFound));
    }
}
