//! Field validation rules for user-submitted data.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Letters (including accented Latin letters and n-tilde) and whitespace.
static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s]+$").expect("valid full name regex"));

/// Validate a person's full name.
pub fn validate_full_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Full name is required".to_string());
    }
    if !FULL_NAME_RE.is_match(name) {
        return Err("Full name may only contain letters, spaces and accents".to_string());
    }
    Ok(())
}

/// Validate a new password and its confirmation.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if password != confirmation {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

/// Trim an optional text field, mapping blank input to `None`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
