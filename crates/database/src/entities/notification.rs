//! Notification entity definitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub public_id: String,
    pub recipient_id: i64,
    pub kind: NotificationKind,
    pub message: String,
    pub related_entity_id: Option<String>,
    pub related_entity_type: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateNotificationRequest {
    pub recipient_id: i64,
    pub kind: NotificationKind,
    pub message: String,
    pub related_entity_id: Option<String>,
    pub related_entity_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    GroupAdded,
    NewMessage,
    NewEvent,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::GroupAdded => "group_added",
            NotificationKind::NewMessage => "new_message",
            NotificationKind::NewEvent => "new_event",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group_added" => Ok(NotificationKind::GroupAdded),
            "new_message" => Ok(NotificationKind::NewMessage),
            "new_event" => Ok(NotificationKind::NewEvent),
            _ => Err(()),
        }
    }
}

impl ToString for NotificationKind {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}
