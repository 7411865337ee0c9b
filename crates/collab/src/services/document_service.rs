//! Document service: shared file metadata with opaque base64 content.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use clubhouse_database::{
    Account, CreateDocumentRecord, Document, DocumentError, DocumentRepository,
    DocumentResult, DocumentSummary, GroupRepository,
};
use clubhouse_policy::{decide, Action, Actor, Context};

/// Document upload payload. The optional group scope is a public group id;
/// content is a base64 payload the service treats as opaque beyond checking
/// that it decodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub name: String,
    pub group_id: Option<String>,
    pub content: String,
    pub file_type: String,
}

/// Service for document sharing.
#[derive(Clone)]
pub struct DocumentService {
    documents: DocumentRepository,
    groups: GroupRepository,
}

impl DocumentService {
    /// Create a new document service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            documents: DocumentRepository::new(pool.clone()),
            groups: GroupRepository::new(pool),
        }
    }

    /// Upload a document. Requires an elevated role; the uploader's display
    /// name is captured as a snapshot. The response is the content-free
    /// summary; content only comes back from single-item fetches.
    pub async fn upload(
        &self,
        actor: &Account,
        request: &CreateDocumentRequest,
    ) -> DocumentResult<DocumentSummary> {
        decide(
            &Actor::new(actor.id, actor.role),
            Action::CreateDocument,
            &Context::none(),
        )
        .map_err(|d| DocumentError::Forbidden(d.to_string()))?;

        if request.name.trim().is_empty() {
            return Err(DocumentError::Validation("document name must not be empty".to_string()));
        }

        if BASE64.decode(&request.content).is_err() {
            return Err(DocumentError::Validation("content must be valid base64".to_string()));
        }

        let group_id = match request.group_id.as_deref() {
            None => None,
            Some(public_id) => Some(
                self.groups
                    .find_by_public_id(public_id)
                    .await
                    .map_err(|e| DocumentError::DatabaseError(e.to_string()))?
                    .ok_or_else(|| {
                        DocumentError::Validation(format!("unknown group scope: {public_id}"))
                    })?
                    .id,
            ),
        };

        let record = CreateDocumentRecord {
            name: request.name.clone(),
            group_id,
            content: request.content.clone(),
            file_type: request.file_type.clone(),
            uploaded_by: actor.id,
            uploader_name: actor.display_name.clone(),
        };

        let document = self.documents.create(&record).await?;

        Ok(DocumentSummary {
            id: document.id,
            public_id: document.public_id,
            name: document.name,
            group_id: document.group_id,
            file_type: document.file_type,
            uploaded_by: document.uploaded_by,
            uploader_name: document.uploader_name,
            created_at: document.created_at,
        })
    }

    /// List document summaries, newest first, optionally scoped to a group.
    /// An unknown group filter yields an empty list.
    pub async fn list(&self, group_public_id: Option<&str>) -> DocumentResult<Vec<DocumentSummary>> {
        let group_id = match group_public_id {
            None => None,
            Some(public_id) => {
                match self
                    .groups
                    .find_by_public_id(public_id)
                    .await
                    .map_err(|e| DocumentError::DatabaseError(e.to_string()))?
                {
                    Some(group) => Some(group.id),
                    None => return Ok(Vec::new()),
                }
            }
        };

        self.documents.list(group_id).await
    }

    /// Fetch one document, content included.
    pub async fn get(&self, public_id: &str) -> DocumentResult<Document> {
        self.documents
            .find_by_public_id(public_id)
            .await?
            .ok_or(DocumentError::DocumentNotFound)
    }

    /// Delete a document. Requires an elevated role.
    pub async fn delete(&self, actor: &Account, public_id: &str) -> DocumentResult<()> {
        decide(
            &Actor::new(actor.id, actor.role),
            Action::DeleteDocument,
            &Context::none(),
        )
        .map_err(|d| DocumentError::Forbidden(d.to_string()))?;

        self.documents.delete(public_id).await
    }
}
