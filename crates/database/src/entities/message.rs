//! Message entity definitions

use serde::{Deserialize, Serialize};

/// A message in a group's append-only log.
///
/// `sender_name` is the sender's display name at send time, a historical
/// snapshot that is never refreshed when the account renames itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub public_id: String,
    pub group_id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub content: String,
    pub created_at: String,
}
