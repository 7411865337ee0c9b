//! Authentication service: registration, login, and token verification.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use clubhouse_config::AuthConfig;
use clubhouse_database::{
    Account, AccountError, AccountRepository, AuthError, AuthResult, CreateAccountRecord, Role,
};

use crate::utils::jwt::JwtManager;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::{validate_display_name, validate_email, validate_password};

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    /// Optional role name; defaults to `member`. Unknown values are rejected.
    pub role: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Service for registration, login, and token verification.
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountRepository,
    jwt: JwtManager,
}

impl AuthService {
    /// Create a new auth service instance
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            jwt: JwtManager::new(&config.jwt_secret, config.issuer.clone()),
        }
    }

    /// Register a new account and issue its first token.
    ///
    /// A duplicate email is a conflict and performs no insert.
    pub async fn register(&self, request: &RegisterRequest) -> AuthResult<(Account, String)> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        validate_display_name(&request.display_name)?;

        let role = match request.role.as_deref() {
            None => Role::Member,
            Some(value) => Role::parse(value)
                .ok_or_else(|| AuthError::Validation(format!("unknown role: {value}")))?,
        };

        let password_hash = hash_password(&request.password)?;

        let record = CreateAccountRecord {
            email: request.email.clone(),
            password_hash,
            display_name: request.display_name.clone(),
            role,
        };

        let account = self.accounts.create(&record).await.map_err(|e| match e {
            AccountError::EmailAlreadyExists => AuthError::EmailAlreadyRegistered,
            other => AuthError::DatabaseError(other.to_string()),
        })?;

        info!(account = %account.public_id, "registered new account");

        let token = self.jwt.generate_token(&account.public_id)?;
        Ok((account, token))
    }

    /// Verify credentials and issue a token.
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller; both come back as [`AuthError::Unauthorized`].
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<(Account, String)> {
        let (account, stored_hash) = self
            .accounts
            .find_credentials(&request.email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&request.password, &stored_hash)? {
            return Err(AuthError::Unauthorized);
        }

        let token = self.jwt.generate_token(&account.public_id)?;
        Ok((account, token))
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate(&self, token: &str) -> AuthResult<Account> {
        let claims = self.jwt.validate_token(token)?;

        self.accounts
            .find_by_public_id(&claims.sub)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::Unauthorized)
    }
}
