//! Document entity definitions

use serde::{Deserialize, Serialize};

/// Full document record including its content payload.
///
/// Content is an opaque base64 string; only single-item fetches return it.
/// `uploader_name` is a snapshot of the uploader's display name at upload
/// time, never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub group_id: Option<i64>,
    pub content: String,
    pub file_type: String,
    pub uploaded_by: i64,
    pub uploader_name: String,
    pub created_at: String,
}

/// List projection of a document: everything except the content payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub group_id: Option<i64>,
    pub file_type: String,
    pub uploaded_by: i64,
    pub uploader_name: String,
    pub created_at: String,
}

/// Record for inserting a new document.
#[derive(Debug, Clone)]
pub struct CreateDocumentRecord {
    pub name: String,
    pub group_id: Option<i64>,
    pub content: String,
    pub file_type: String,
    pub uploaded_by: i64,
    pub uploader_name: String,
}
