//! Group entity definitions

use serde::{Deserialize, Serialize};

/// Group entity with its member set.
///
/// `members` carries account public ids; uniqueness is guaranteed by the
/// `group_members` primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub description: Option<String>,
    pub group_type: String,
    pub created_by: i64,
    pub members: Vec<String>,
    pub created_at: String,
}

/// Membership row joined with the account's public id, for fan-out and
/// member listings.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMember {
    pub account_id: i64,
    pub account_public_id: String,
    pub added_at: String,
}

/// Request for creating a new group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
    pub group_type: Option<String>,
}

/// Partial group update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateGroupRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
