//! JWT (JSON Web Token) utilities for authentication.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use clubhouse_database::AuthError;

/// Token validity window. Fixed by contract, not configuration.
pub const TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (account public id)
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued at
    pub nbf: usize,  // Not before
    pub iss: String, // Issuer
    pub jti: String, // JWT ID
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_duration: Duration,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, issuer: String) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        let decoding_key = DecodingKey::from_secret(secret.as_ref());

        Self {
            encoding_key,
            decoding_key,
            issuer,
            token_duration: TOKEN_TTL,
        }
    }

    /// Set custom token duration (tests only; the production window is
    /// [`TOKEN_TTL`]).
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.token_duration = duration;
        self
    }

    /// Generate a new JWT token for an account
    pub fn generate_token(&self, account_public_id: &str) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::TokenCreation("System time error".to_string()))?;

        let exp = now + self.token_duration;

        let claims = Claims {
            sub: account_public_id.to_string(),
            exp: exp.as_secs() as usize,
            iat: now.as_secs() as usize,
            nbf: now.as_secs() as usize,
            iss: self.issuer.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenCreation("Failed to encode token".to_string()))
    }

    /// Validate and decode a JWT token.
    ///
    /// Every failure mode (malformed, expired, wrong issuer, bad signature)
    /// collapses into [`AuthError::Unauthorized`].
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::Unauthorized)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_jwt_manager() -> JwtManager {
        JwtManager::new(
            "test_secret_key_that_is_long_enough_for_hs256",
            "test_issuer".to_string(),
        )
    }

    #[test]
    fn test_token_generation_and_validation() {
        let jwt_manager = create_test_jwt_manager();

        let token = jwt_manager.generate_token("acct_123").unwrap();
        assert!(!token.is_empty());

        let claims = jwt_manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "acct_123");
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_seven_day_validity_window() {
        let jwt_manager = create_test_jwt_manager();

        let token = jwt_manager.generate_token("acct_123").unwrap();
        let claims = jwt_manager.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_invalid_token_collapses_to_unauthorized() {
        let jwt_manager = create_test_jwt_manager();

        let result = jwt_manager.validate_token("invalid.jwt.token");
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[test]
    fn test_wrong_secret_collapses_to_unauthorized() {
        let jwt_manager = create_test_jwt_manager();
        let other = JwtManager::new("a_completely_different_secret_value", "test_issuer".to_string());

        let token = other.generate_token("acct_123").unwrap();
        let result = jwt_manager.validate_token(&token);
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt_manager = create_test_jwt_manager().with_duration(Duration::from_secs(0));

        let token = jwt_manager.generate_token("acct_123").unwrap();
        std::thread::sleep(Duration::from_millis(10));

        // Zero leeway so the zero-duration token counts as expired now.
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_issuer(&["test_issuer"]);
        validation.leeway = 0;
        let result = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret("test_secret_key_that_is_long_enough_for_hs256".as_ref()),
            &validation,
        );
        assert!(result.is_err());
    }
}
