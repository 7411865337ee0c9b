//! Business logic services for identity.

pub mod auth_service;
pub mod account_service;

pub use auth_service::{AuthService, LoginRequest, RegisterRequest};
pub use account_service::AccountService;
