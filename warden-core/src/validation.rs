//! Presence checks shared by the services
//!
//! The services re-validate their inputs even when a façade has already done so.
use chrono::{DateTime, Utc};

use crate::error::ValidationError;

pub fn require_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    Ok(())
}

pub fn require_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}

pub fn require_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::EmptyCode);
    }
    Ok(())
}

/// The Unix epoch stands in for an unset timestamp.
pub fn require_expires_at(expires_at: DateTime<Utc>) -> Result<(), ValidationError> {
    if expires_at == DateTime::<Utc>::default() {
        return Err(ValidationError::EmptyExpiresAt);
    }
    Ok(())
}
