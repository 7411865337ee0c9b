//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Account-specific errors
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found")]
    AccountNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Unknown role: {0}")]
    InvalidRole(String),

    #[error("No fields to update")]
    EmptyUpdate,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Authentication errors.
///
/// Every authentication failure collapses into [`AuthError::Unauthorized`] so
/// callers cannot tell a missing account from a bad password or a stale token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Group and messaging errors
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("Group not found")]
    GroupNotFound,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Message not found")]
    MessageNotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Event and attendance errors
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found")]
    EventNotFound,

    #[error("Event is full")]
    CapacityExceeded,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Notification errors
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotificationNotFound,

    #[error("Invalid notification kind")]
    InvalidKind,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found")]
    DocumentNotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
