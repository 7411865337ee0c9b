//! Input validation for registration and profile data.

use once_cell::sync::Lazy;
use regex::Regex;
use clubhouse_database::AuthError;

const MIN_PASSWORD_LENGTH: usize = 6;
const MIN_DISPLAY_NAME_LENGTH: usize = 2;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Validate an email address shape.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(AuthError::Validation("invalid email address".to_string()))
    }
}

/// Validate a registration password.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a display name.
pub fn validate_display_name(name: &str) -> Result<(), AuthError> {
    if name.trim().chars().count() < MIN_DISPLAY_NAME_LENGTH {
        return Err(AuthError::Validation(format!(
            "display name must be at least {MIN_DISPLAY_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
