//! Input validation utilities shared by account and shelter forms.

use regex::Regex;
use thiserror::Error;

pub const NAME_MAX: usize = 100;
pub const ACCOUNT_MAX: usize = 70;
pub const EMAIL_MAX: usize = 100;
pub const PHONE_MAX: usize = 15;
pub const ADDRESS_MAX: usize = 150;
pub const TEXT_MAX: usize = 2_000;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Trim, drop control characters and cap the length (in characters).
pub fn sanitize_input(value: &str, max_len: usize) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .take(max_len)
        .collect::<String>()
        .trim_end()
        .to_string()
}

pub fn sanitize_optional(value: Option<&str>, max_len: usize) -> Option<String> {
    value
        .map(|v| sanitize_input(v, max_len))
        .filter(|v| !v.is_empty())
}

/// Sanitize a mandatory field, failing when nothing is left.
pub fn required(field: &str, value: &str, max_len: usize) -> Result<String, ValidationError> {
    let cleaned = sanitize_input(value, max_len);
    if cleaned.is_empty() {
        return Err(ValidationError::new(format!("{field} is required")));
    }
    Ok(cleaned)
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .map_err(|_| ValidationError::new("invalid email regex"))?;

    if email.len() > EMAIL_MAX || !email_regex.is_match(email) {
        return Err(ValidationError::new("invalid email format"));
    }

    Ok(())
}

/// Validate a new password and its confirmation.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    if password != confirmation {
        return Err(ValidationError::new("passwords do not match"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_trims_strips_controls_and_truncates() {
        assert_eq!(sanitize_input("  Luna\u{0007}  ", 10), "Luna");
        assert_eq!(sanitize_input("abcdefghij", 4), "abcd");
        assert_eq!(sanitize_input("Ñandú", 3), "Ñan");
    }

    #[test]
    fn required_rejects_blank_values() {
        let error = required("name", "   ", NAME_MAX).unwrap_err();
        assert_eq!(error.to_string(), "name is required");
    }

    #[test]
    fn email_format_is_checked() {
        assert!(validate_email("ana@example.cl").is_ok());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("not an email").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_new_password("secret", "secret").is_ok());
        assert!(validate_new_password("short", "short").is_err());
        let mismatch = validate_new_password("secret1", "secret2").unwrap_err();
        assert_eq!(mismatch.to_string(), "passwords do not match");
    }
}
