//! Per-field validation rules used by the data-collecting steps.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Inline validation failure for a single field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Simple `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Require a non-blank value for the field named `label`
pub fn require(label: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::Required(label))
    } else {
        Ok(())
    }
}

/// Email must be present and well-formed
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    require("Email", email)?;
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(FieldError::InvalidEmail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_passes() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(is_valid_email("john.doe+block@mail.example.co"));
    }

    #[test]
    fn test_malformed_email_rejected() {
        assert_eq!(
            validate_email("not-an-email"),
            Err(FieldError::InvalidEmail)
        );
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("user@@example.com"));
    }

    #[test]
    fn test_blank_email_is_required() {
        let err = validate_email("   ").unwrap_err();
        assert_eq!(err, FieldError::Required("Email"));
        assert_eq!(err.to_string(), "Email is required");
    }

    #[test]
    fn test_require_message() {
        assert_eq!(
            require("First name", "").unwrap_err().to_string(),
            "First name is required"
        );
        assert!(require("First name", "Ada").is_ok());
    }
}
