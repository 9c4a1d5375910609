//! Field normalization and length checks for request payloads.

use crate::constants::{
    MAX_DESCRIPTION_CHARS, MAX_NAME_CHARS, MAX_TITLE_CHARS, MAX_USERNAME_CHARS,
};
use crate::AppError;

fn bounded(field: &str, raw: &str, limit: usize, required: bool) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if required && trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > limit {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, limit
        )));
    }
    Ok(trimmed.to_string())
}

pub(super) fn title(raw: &str) -> Result<String, AppError> {
    bounded("Title", raw, MAX_TITLE_CHARS, true)
}

pub(super) fn description(raw: &str) -> Result<String, AppError> {
    bounded("Description", raw, MAX_DESCRIPTION_CHARS, false)
}

/// Language and tag names share one rule set.
pub(super) fn name(raw: &str) -> Result<String, AppError> {
    bounded("Name", raw, MAX_NAME_CHARS, true)
}

pub(super) fn username(raw: &str) -> Result<String, AppError> {
    let username = bounded("Username", raw, MAX_USERNAME_CHARS, true)?;
    if username.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "Username must not contain whitespace".to_string(),
        ));
    }
    Ok(username)
}
