//! Shared types for the database layer.

pub mod errors;

pub use errors::{
    DatabaseError, AccountError, AuthError, GroupError, EventError, NotificationError,
    DocumentError,
};

/// Result type alias for general database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Result type alias for account operations
pub type AccountResult<T> = Result<T, AccountError>;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type alias for group and messaging operations
pub type GroupResult<T> = Result<T, GroupError>;

/// Result type alias for event operations
pub type EventResult<T> = Result<T, EventError>;

/// Result type alias for notification operations
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Result type alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;
