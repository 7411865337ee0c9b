//! # Clubhouse Collab Crate
//!
//! Group membership, messaging, events with attendance tracking,
//! notification fan-out, document sharing, and the dashboard composition
//! for the Clubhouse backend.
//!
//! - **Services**: business logic, one per resource
//! - **Clock**: injected date source for upcoming-event filtering

pub mod clock;
pub mod services;

// Re-export database types and repositories
pub use clubhouse_database::{
    Group, GroupMember, Message, Event, Notification, NotificationKind, Document,
    DocumentSummary, CreateGroupRequest, UpdateGroupRequest, UpdateEventRequest,
    GroupResult, GroupError, EventResult, EventError, NotificationResult,
    NotificationError, DocumentResult, DocumentError,
};

pub use clock::{Clock, SystemClock, FixedClock};
pub use services::{
    GroupService, MessageService, EventService, NotificationService, DocumentService,
    DashboardService, CreateEventRequest, CreateDocumentRequest, Dashboard,
};
