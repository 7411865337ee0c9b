//! Business logic services for collaboration resources.

pub mod group_service;
pub mod message_service;
pub mod event_service;
pub mod notification_service;
pub mod document_service;
pub mod dashboard_service;

pub use group_service::GroupService;
pub use message_service::MessageService;
pub use event_service::{EventService, CreateEventRequest};
pub use notification_service::NotificationService;
pub use document_service::{DocumentService, CreateDocumentRequest};
pub use dashboard_service::{DashboardService, Dashboard};
