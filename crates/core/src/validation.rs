//! Input checks for registration and password changes.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum password length in bytes. Bounds the hashing cost per request.
pub const MAX_PASSWORD_LENGTH: usize = 1024;

/// Validate a username: non-empty, bounded, no whitespace or control characters.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::InvalidRequest("Username must not be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::InvalidRequest(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters long"
        )));
    }
    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(CoreError::InvalidRequest(
            "Username must not contain whitespace".into(),
        ));
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !email.validate_email() {
        return Err(CoreError::InvalidRequest(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate a plaintext password: non-empty and bounded.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.is_empty() {
        return Err(CoreError::InvalidRequest("Password must not be empty".into()));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(CoreError::InvalidRequest(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} bytes long"
        )));
    }
    Ok(())
}

/// Validate all registration fields.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), CoreError> {
    validate_username(username)?;
    validate_email(email)?;
    validate_password(password)
}
