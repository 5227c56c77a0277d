//! Input validation helpers
//!
//! Centralized text length constants and validation functions. Limits are
//! chosen as reasonable UX limits for names, descriptions and URLs; the
//! store does not enforce text lengths on its own.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, business, ad title, category, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, notes, ban reasons
pub const MAX_TEXT_LEN: usize = 2000;

/// Short identifiers: phone numbers, payment references
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image references
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_empty() {
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("ok", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn test_required_text_rejects_too_long() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", MAX_TEXT_LEN).is_ok());
        assert!(validate_optional_text(&Some("fine".into()), "notes", MAX_TEXT_LEN).is_ok());
        let long = Some("x".repeat(MAX_TEXT_LEN + 1));
        assert!(validate_optional_text(&long, "notes", MAX_TEXT_LEN).is_err());
    }
}
