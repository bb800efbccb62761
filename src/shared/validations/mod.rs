use crate::shared::{DomainError, DomainResult};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const USERNAME_RULE_MESSAGE: &str =
    "Username contains invalid characters. Only letters, numbers, and underscores are allowed.";

/// `[A-Za-z0-9_]+`
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn validate_username(username: &str) -> DomainResult<()> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(DomainError::Validation(USERNAME_RULE_MESSAGE.into()))
    }
}

pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters long.",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_new_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::Validation(format!(
            "New password must be at least {} characters long.",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
