//! Entity definitions for the Clubhouse backend.

pub mod account;
pub mod group;
pub mod message;
pub mod event;
pub mod notification;
pub mod document;

pub use account::{Account, Role, CreateAccountRecord, UpdateProfileRequest};
pub use group::{Group, GroupMember, CreateGroupRequest, UpdateGroupRequest};
pub use message::Message;
pub use event::{Event, AttendanceStatus, CreateEventRecord, UpdateEventRequest};
pub use notification::{Notification, NotificationKind, CreateNotificationRequest};
pub use document::{Document, DocumentSummary, CreateDocumentRecord};
