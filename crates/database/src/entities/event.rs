//! Event entity definitions

use serde::{Deserialize, Serialize};

/// Scheduled event with attendance tracking.
///
/// `attendees` and `declined` carry account public ids. The two sets are
/// disjoint by construction: each account has at most one response row per
/// event, and that row's status is either attending or declined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub group_id: Option<i64>,
    pub capacity: Option<i64>,
    pub created_by: i64,
    pub attendees: Vec<String>,
    pub declined: Vec<String>,
    pub created_at: String,
}

/// Record for inserting a new event. The date has already been validated as
/// `YYYY-MM-DD` and the optional group scope resolved to its internal id.
#[derive(Debug, Clone)]
pub struct CreateEventRecord {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub group_id: Option<i64>,
    pub capacity: Option<i64>,
}

/// Partial event update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.location.is_none()
            && self.capacity.is_none()
    }
}

/// Per-(event, account) attendance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Attending,
    Declined,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Attending => "attending",
            AttendanceStatus::Declined => "declined",
        }
    }
}

impl From<&str> for AttendanceStatus {
    fn from(s: &str) -> Self {
        match s {
            "declined" => AttendanceStatus::Declined,
            _ => AttendanceStatus::Attending,
        }
    }
}

impl ToString for AttendanceStatus {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}
