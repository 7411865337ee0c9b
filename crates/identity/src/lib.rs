//! # Clubhouse Identity Crate
//!
//! Account management and authentication for the Clubhouse backend:
//! registration, login, token verification, profile updates, and role
//! changes.
//!
//! - **Services**: [`AuthService`], [`AccountService`]
//! - **Utils**: JWT issue/verify, argon2 password hashing, input validation

pub mod services;
pub mod utils;

// Re-export database types and repositories
pub use clubhouse_database::{
    Account, Role, AccountRepository, UpdateProfileRequest,
    AccountResult, AccountError, AuthResult, AuthError,
};

pub use services::{AuthService, AccountService, LoginRequest, RegisterRequest};
pub use utils::jwt::{JwtManager, Claims, TOKEN_TTL};
